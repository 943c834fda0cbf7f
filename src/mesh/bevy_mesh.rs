//! Conversion between Bevy [`Mesh`] assets and [`MeshBuffers`].

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, MeshVertexAttribute, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;

use super::{ATTRIBUTE_UV_2, ATTRIBUTE_UV_3, AttributeSet, BoneWeight, MeshBuffers, VertexAttribute};
use crate::weld::{WeldError, WeldReport, WeldSettings, weld};

/// Bevy attributes backing each UV channel.
const UV_ATTRIBUTES: [MeshVertexAttribute; 4] = [
    Mesh::ATTRIBUTE_UV_0,
    Mesh::ATTRIBUTE_UV_1,
    ATTRIBUTE_UV_2,
    ATTRIBUTE_UV_3,
];

fn float2(values: &VertexAttributeValues) -> Option<&Vec<[f32; 2]>> {
    match values {
        VertexAttributeValues::Float32x2(v) => Some(v),
        _ => None,
    }
}

fn float3(values: &VertexAttributeValues) -> Option<&Vec<[f32; 3]>> {
    match values {
        VertexAttributeValues::Float32x3(v) => Some(v),
        _ => None,
    }
}

fn float4(values: &VertexAttributeValues) -> Option<&Vec<[f32; 4]>> {
    match values {
        VertexAttributeValues::Float32x4(v) => Some(v),
        _ => None,
    }
}

fn uint16x4(values: &VertexAttributeValues) -> Option<&Vec<[u16; 4]>> {
    match values {
        VertexAttributeValues::Uint16x4(v) => Some(v),
        _ => None,
    }
}

/// Copy an attribute out of `mesh`. A missing attribute reads as an empty buffer.
fn read<T: Clone>(
    mesh: &Mesh,
    attribute: MeshVertexAttribute,
    extract: fn(&VertexAttributeValues) -> Option<&Vec<T>>,
) -> Result<Vec<T>, WeldError> {
    match mesh.attribute(attribute.id) {
        None => Ok(Vec::new()),
        Some(values) => extract(values).cloned().ok_or(WeldError::UnexpectedFormat {
            attribute: attribute.name,
        }),
    }
}

impl MeshBuffers {
    /// Read the vertex data of a triangle list [`Mesh`].
    ///
    /// The mesh's index buffer becomes the only submesh. A mesh without indices
    /// gets sequential ones, one per vertex. Bone weights are read only when both
    /// joint indices and joint weights are present.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, WeldError> {
        let topology = mesh.primitive_topology();
        if topology != PrimitiveTopology::TriangleList {
            return Err(WeldError::UnsupportedTopology {
                topology: format!("{topology:?}"),
            });
        }

        let positions = read(mesh, Mesh::ATTRIBUTE_POSITION, float3)?;
        let joint_indices = read(mesh, Mesh::ATTRIBUTE_JOINT_INDEX, uint16x4)?;
        let joint_weights = read(mesh, Mesh::ATTRIBUTE_JOINT_WEIGHT, float4)?;
        let bone_weights = if joint_indices.is_empty() || joint_weights.is_empty() {
            Vec::new()
        } else if joint_indices.len() != joint_weights.len() {
            return Err(WeldError::MalformedMesh {
                attribute: VertexAttribute::BoneWeight,
                len: joint_weights.len(),
                expected: joint_indices.len(),
            });
        } else {
            joint_indices
                .into_iter()
                .zip(joint_weights)
                .map(|(indices, weights)| BoneWeight::new(indices, weights))
                .collect()
        };

        let indices = match mesh.indices() {
            Some(Indices::U16(indices)) => indices.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(indices)) => indices.clone(),
            None => (0..positions.len() as u32).collect(),
        };

        Ok(Self {
            normals: read(mesh, Mesh::ATTRIBUTE_NORMAL, float3)?,
            tangents: read(mesh, Mesh::ATTRIBUTE_TANGENT, float4)?,
            colors: read(mesh, Mesh::ATTRIBUTE_COLOR, float4)?,
            uvs: [
                read(mesh, UV_ATTRIBUTES[0], float2)?,
                read(mesh, UV_ATTRIBUTES[1], float2)?,
                read(mesh, UV_ATTRIBUTES[2], float2)?,
                read(mesh, UV_ATTRIBUTES[3], float2)?,
            ],
            bone_weights,
            submeshes: vec![indices],
            positions,
        })
    }

    /// Write positions, the channels in `attributes`, and indices back into `mesh`.
    ///
    /// All submeshes are concatenated into the mesh's single index buffer. If the
    /// mesh already uses 16-bit indices and they still fit, they stay 16-bit.
    pub fn write_to_mesh(&self, mesh: &mut Mesh, attributes: AttributeSet) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());

        for attribute in attributes.channels() {
            match attribute {
                VertexAttribute::Position => {}
                VertexAttribute::Normal => {
                    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone());
                }
                VertexAttribute::Tangent => {
                    mesh.insert_attribute(Mesh::ATTRIBUTE_TANGENT, self.tangents.clone());
                }
                VertexAttribute::Color => {
                    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors.clone());
                }
                VertexAttribute::Uv1
                | VertexAttribute::Uv2
                | VertexAttribute::Uv3
                | VertexAttribute::Uv4 => {
                    let Some(channel) = attribute.uv_channel() else {
                        continue;
                    };
                    mesh.insert_attribute(UV_ATTRIBUTES[channel], self.uvs[channel].clone());
                }
                VertexAttribute::BoneWeight => {
                    let (indices, weights): (Vec<[u16; 4]>, Vec<[f32; 4]>) = self
                        .bone_weights
                        .iter()
                        .map(|bw| (bw.indices, bw.weights))
                        .unzip();
                    mesh.insert_attribute(
                        Mesh::ATTRIBUTE_JOINT_INDEX,
                        VertexAttributeValues::Uint16x4(indices),
                    );
                    mesh.insert_attribute(Mesh::ATTRIBUTE_JOINT_WEIGHT, weights);
                }
            }
        }

        let indices: Vec<u32> = self.submeshes.iter().flatten().copied().collect();
        let keep_u16 = matches!(mesh.indices(), Some(Indices::U16(_)))
            && self.vertex_count() <= u16::MAX as usize + 1;
        if keep_u16 {
            mesh.insert_indices(Indices::U16(indices.iter().map(|&i| i as u16).collect()));
        } else {
            mesh.insert_indices(Indices::U32(indices));
        }
    }

    /// Build a new triangle list [`Mesh`] holding every non-empty channel.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        );
        self.write_to_mesh(&mut mesh, self.attributes());
        mesh
    }
}

/// Extension trait for welding Bevy meshes in place.
pub trait MeshWeldExt {
    /// Merge duplicate vertices of this mesh.
    ///
    /// See [`weld`] for the comparison rules. Channels not compared are left
    /// as they were, so they may no longer match the vertex count.
    fn weld_vertices(
        &mut self,
        attributes: AttributeSet,
        settings: &WeldSettings,
    ) -> Result<WeldReport, WeldError>;
}

impl MeshWeldExt for Mesh {
    fn weld_vertices(
        &mut self,
        attributes: AttributeSet,
        settings: &WeldSettings,
    ) -> Result<WeldReport, WeldError> {
        let mut buffers = MeshBuffers::from_mesh(self)?;
        let report = weld(&mut buffers, attributes, settings)?;
        buffers.write_to_mesh(self, report.compared);

        let stale = buffers.attributes() - report.compared;
        if !stale.is_empty() && report.removed_count() > 0 {
            warn!(
                "Welded mesh keeps uncompared channels {} at {} vertices; remove or recompute them before rendering",
                stale, report.original_count
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_count(mesh: &Mesh) -> usize {
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            .map(|a| a.len())
            .unwrap_or(0)
    }

    fn index_list(mesh: &Mesh) -> Vec<usize> {
        mesh.indices().map(|i| i.iter().collect()).unwrap_or_default()
    }

    #[test]
    fn test_bevy_cuboid_position_weld() {
        let mut mesh = Mesh::from(Cuboid::new(1.0, 1.0, 1.0));
        let triangles = index_list(&mesh).len() / 3;

        let report = mesh
            .weld_vertices(AttributeSet::POSITION, &WeldSettings::default())
            .unwrap();

        assert_eq!(report.original_count, 24);
        assert_eq!(report.welded_count, 8);
        assert_eq!(vertex_count(&mesh), 8);
        let indices = index_list(&mesh);
        assert_eq!(indices.len() / 3, triangles);
        assert!(indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn test_bevy_cuboid_with_normals() {
        let mut mesh = Mesh::from(Cuboid::new(2.0, 2.0, 2.0));
        let report = mesh
            .weld_vertices(
                AttributeSet::NORMAL | AttributeSet::UV1,
                &WeldSettings::default(),
            )
            .unwrap();

        assert_eq!(report.welded_count, 24);
        let normals = mesh.attribute(Mesh::ATTRIBUTE_NORMAL).map(|a| a.len());
        assert_eq!(normals, Some(24));
    }

    #[test]
    fn test_round_trip_channels() {
        let buffers = MeshBuffers::cube(1.0)
            .with_colors(vec![[1.0, 0.5, 0.25, 1.0]; 24])
            .with_uvs(3, vec![[0.5, 0.5]; 24])
            .with_bone_weights(vec![BoneWeight::single(2); 24]);

        let mesh = buffers.to_mesh();
        assert!(mesh.attribute(ATTRIBUTE_UV_3).is_some());
        assert!(matches!(
            mesh.attribute(Mesh::ATTRIBUTE_JOINT_INDEX),
            Some(VertexAttributeValues::Uint16x4(_))
        ));

        let read_back = MeshBuffers::from_mesh(&mesh).unwrap();
        assert_eq!(read_back, buffers);
    }

    #[test]
    fn test_u16_indices_preserved() {
        let mut mesh = MeshBuffers::cube(1.0).to_mesh();
        let indices: Vec<u16> = index_list(&mesh).into_iter().map(|i| i as u16).collect();
        mesh.insert_indices(Indices::U16(indices));

        mesh.weld_vertices(AttributeSet::POSITION, &WeldSettings::default())
            .unwrap();

        assert!(matches!(mesh.indices(), Some(Indices::U16(_))));
        assert!(index_list(&mesh).iter().all(|&i| i < 8));
    }

    #[test]
    fn test_non_indexed_mesh_gets_indices() {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![
                [0.0f32, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
        );

        mesh.weld_vertices(AttributeSet::POSITION, &WeldSettings::default())
            .unwrap();

        assert_eq!(vertex_count(&mesh), 4);
        assert_eq!(index_list(&mesh), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_joint_buffers_length_mismatch() {
        let mut mesh = MeshBuffers::new(vec![[0.0; 3]; 3])
            .with_submesh(vec![0, 1, 2])
            .to_mesh();
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_JOINT_INDEX,
            VertexAttributeValues::Uint16x4(vec![[0, 0, 0, 0]; 3]),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_JOINT_WEIGHT, vec![[1.0f32, 0.0, 0.0, 0.0]; 2]);

        assert_eq!(
            MeshBuffers::from_mesh(&mesh),
            Err(WeldError::MalformedMesh {
                attribute: VertexAttribute::BoneWeight,
                len: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn test_line_list_rejected() {
        let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0f32; 3]; 2]);

        let result = mesh.weld_vertices(AttributeSet::POSITION, &WeldSettings::default());
        assert!(matches!(result, Err(WeldError::UnsupportedTopology { .. })));
    }
}
