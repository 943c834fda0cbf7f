//! Per-vertex snapshots taken from a mesh before welding.

use crate::mesh::{AttributeSet, BoneWeight, MeshBuffers, VertexAttribute};

/// One vertex's values across the compared channels.
///
/// Fields other than `position` are `Some` only when their channel is compared.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub tangent: Option<[f32; 4]>,
    pub color: Option<[f32; 4]>,
    pub uvs: [Option<[f32; 2]>; 4],
    pub bone_weight: Option<BoneWeight>,
}

/// Snapshot every vertex of `mesh`, in index order.
///
/// `attributes` must already be resolved against the mesh (see
/// [`resolve_attributes`](super::resolve_attributes)) so every compared buffer
/// is as long as the position buffer.
pub fn build_records(mesh: &MeshBuffers, attributes: AttributeSet) -> Vec<VertexRecord> {
    let pick = |attribute: VertexAttribute| attributes.contains(attribute.flag());

    (0..mesh.vertex_count())
        .map(|i| VertexRecord {
            position: mesh.positions[i],
            normal: pick(VertexAttribute::Normal).then(|| mesh.normals[i]),
            tangent: pick(VertexAttribute::Tangent).then(|| mesh.tangents[i]),
            color: pick(VertexAttribute::Color).then(|| mesh.colors[i]),
            uvs: std::array::from_fn(|channel| {
                pick(VertexAttribute::UVS[channel]).then(|| mesh.uvs[channel][i])
            }),
            bone_weight: pick(VertexAttribute::BoneWeight).then(|| mesh.bone_weights[i]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_compared_channels_populated() {
        let mesh = MeshBuffers::new(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
            .with_normals(vec![[0.0, 1.0, 0.0]; 2])
            .with_colors(vec![[1.0, 0.0, 0.0, 1.0]; 2])
            .with_uvs(1, vec![[0.5, 0.5], [0.25, 0.75]]);

        let attributes = AttributeSet::POSITION | AttributeSet::UV2;
        let records = build_records(&mesh, attributes);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(records[1].uvs[1], Some([0.25, 0.75]));
        assert!(records[1].normal.is_none());
        assert!(records[1].color.is_none());
        assert!(records[1].uvs[0].is_none());
    }

    #[test]
    fn test_empty_mesh() {
        assert!(build_records(&MeshBuffers::default(), AttributeSet::all()).is_empty());
    }
}
