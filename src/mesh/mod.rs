//! Mesh data model used by the welder.
//!
//! [`MeshBuffers`] holds parallel per-vertex buffers plus any number of
//! submeshes, each a triangle list indexing into the shared vertices. Bevy
//! meshes convert to and from it through [`MeshWeldExt`].

mod attributes;
mod bevy_mesh;
mod vertex_data;

pub use attributes::{ATTRIBUTE_UV_2, ATTRIBUTE_UV_3, AttributeSet, VertexAttribute};
pub use bevy_mesh::MeshWeldExt;
pub use vertex_data::BoneWeight;

/// Parallel vertex buffers and submesh index buffers.
///
/// Every attribute buffer is either empty (the channel is absent) or as long as
/// [`positions`](Self::positions). Indices in [`submeshes`](Self::submeshes) are
/// read in consecutive triples as triangles.
///
/// # Example
/// ```
/// use bevy_mesh_weld::mesh::MeshBuffers;
///
/// let mesh = MeshBuffers::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
///     .with_normals(vec![[0.0, 0.0, 1.0]; 3])
///     .with_submesh(vec![0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// `w` holds the handedness sign of the tangent basis.
    pub tangents: Vec<[f32; 4]>,
    pub colors: Vec<[f32; 4]>,
    pub uvs: [Vec<[f32; 2]>; 4],
    pub bone_weights: Vec<BoneWeight>,
    pub submeshes: Vec<Vec<u32>>,
}

impl MeshBuffers {
    /// Create a mesh with positions only and no submeshes.
    pub fn new(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_tangents(mut self, tangents: Vec<[f32; 4]>) -> Self {
        self.tangents = tangents;
        self
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = colors;
        self
    }

    /// Set UV channel `channel` (0 to 3).
    ///
    /// # Panics
    /// Panics if `channel` is 4 or greater.
    pub fn with_uvs(mut self, channel: usize, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs[channel] = uvs;
        self
    }

    pub fn with_bone_weights(mut self, bone_weights: Vec<BoneWeight>) -> Self {
        self.bone_weights = bone_weights;
        self
    }

    /// Append a submesh.
    pub fn with_submesh(mut self, indices: Vec<u32>) -> Self {
        self.submeshes.push(indices);
        self
    }

    /// Append a submesh (mutable version).
    pub fn push_submesh(&mut self, indices: Vec<u32>) {
        self.submeshes.push(indices);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Length of the buffer backing `attribute`.
    pub fn buffer_len(&self, attribute: VertexAttribute) -> usize {
        match attribute {
            VertexAttribute::Position => self.positions.len(),
            VertexAttribute::Normal => self.normals.len(),
            VertexAttribute::Tangent => self.tangents.len(),
            VertexAttribute::Color => self.colors.len(),
            VertexAttribute::Uv1 => self.uvs[0].len(),
            VertexAttribute::Uv2 => self.uvs[1].len(),
            VertexAttribute::Uv3 => self.uvs[2].len(),
            VertexAttribute::Uv4 => self.uvs[3].len(),
            VertexAttribute::BoneWeight => self.bone_weights.len(),
        }
    }

    /// Channels with a non-empty buffer. Position is always included.
    pub fn attributes(&self) -> AttributeSet {
        VertexAttribute::ALL
            .into_iter()
            .filter(|a| *a == VertexAttribute::Position || self.buffer_len(*a) > 0)
            .map(VertexAttribute::flag)
            .collect()
    }

    /// An axis-aligned cube centered on the origin with 4 vertices per face.
    ///
    /// Corners are duplicated per face so every face carries its own normal,
    /// tangent and UVs: 24 vertices, 12 triangles, one submesh.
    pub fn cube(half_size: f32) -> Self {
        // (normal, u axis, v axis) with u x v == normal
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut tangents = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in FACES {
            let base = positions.len() as u32;
            for (su, sv) in CORNERS {
                let position: [f32; 3] =
                    std::array::from_fn(|i| (normal[i] + su * u[i] + sv * v[i]) * half_size);
                positions.push(position);
                normals.push(normal);
                tangents.push([u[0], u[1], u[2], 1.0]);
                uvs.push([(su + 1.0) * 0.5, (1.0 - sv) * 0.5]);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions)
            .with_normals(normals)
            .with_tangents(tangents)
            .with_uvs(0, uvs)
            .with_submesh(indices)
    }
}
