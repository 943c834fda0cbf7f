//! Vertex attribute channels and the sets used to select them for welding.

use std::fmt;

use bevy::mesh::MeshVertexAttribute;
use bitflags::bitflags;
use bevy::render::render_resource::VertexFormat;

/// Third UV channel, stored alongside Bevy's built-in `ATTRIBUTE_UV_0` and `ATTRIBUTE_UV_1`.
///
/// Welding maps this attribute to [`VertexAttribute::Uv3`].
pub const ATTRIBUTE_UV_2: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Uv_2", 988541020, VertexFormat::Float32x2);

/// Fourth UV channel. Welding maps this attribute to [`VertexAttribute::Uv4`].
pub const ATTRIBUTE_UV_3: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Uv_3", 988541021, VertexFormat::Float32x2);

/// One channel of per-vertex data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    Tangent,
    Color,
    Uv1,
    Uv2,
    Uv3,
    Uv4,
    BoneWeight,
}

impl VertexAttribute {
    /// Every channel, in buffer order.
    pub const ALL: [VertexAttribute; 9] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::Tangent,
        VertexAttribute::Color,
        VertexAttribute::Uv1,
        VertexAttribute::Uv2,
        VertexAttribute::Uv3,
        VertexAttribute::Uv4,
        VertexAttribute::BoneWeight,
    ];

    /// The four UV channels, indexed like [`MeshBuffers::uvs`](crate::mesh::MeshBuffers::uvs).
    pub const UVS: [VertexAttribute; 4] = [
        VertexAttribute::Uv1,
        VertexAttribute::Uv2,
        VertexAttribute::Uv3,
        VertexAttribute::Uv4,
    ];

    /// The [`AttributeSet`] flag for this channel.
    pub const fn flag(self) -> AttributeSet {
        match self {
            VertexAttribute::Position => AttributeSet::POSITION,
            VertexAttribute::Normal => AttributeSet::NORMAL,
            VertexAttribute::Tangent => AttributeSet::TANGENT,
            VertexAttribute::Color => AttributeSet::COLOR,
            VertexAttribute::Uv1 => AttributeSet::UV1,
            VertexAttribute::Uv2 => AttributeSet::UV2,
            VertexAttribute::Uv3 => AttributeSet::UV3,
            VertexAttribute::Uv4 => AttributeSet::UV4,
            VertexAttribute::BoneWeight => AttributeSet::BONE_WEIGHT,
        }
    }

    /// Index into the UV buffers, or `None` for non-UV channels.
    pub const fn uv_channel(self) -> Option<usize> {
        match self {
            VertexAttribute::Uv1 => Some(0),
            VertexAttribute::Uv2 => Some(1),
            VertexAttribute::Uv3 => Some(2),
            VertexAttribute::Uv4 => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for VertexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::Tangent => "tangent",
            VertexAttribute::Color => "color",
            VertexAttribute::Uv1 => "uv1",
            VertexAttribute::Uv2 => "uv2",
            VertexAttribute::Uv3 => "uv3",
            VertexAttribute::Uv4 => "uv4",
            VertexAttribute::BoneWeight => "bone weight",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// A set of [`VertexAttribute`] channels.
    ///
    /// Used both for the channels present on a mesh and for the channels a caller
    /// wants compared during a weld.
    ///
    /// # Example
    /// ```
    /// use bevy_mesh_weld::mesh::{AttributeSet, VertexAttribute};
    ///
    /// let set = AttributeSet::NORMAL | AttributeSet::UV1;
    /// assert!(set.contains(VertexAttribute::Normal.flag()));
    /// assert!(!set.contains(AttributeSet::COLOR));
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AttributeSet: u16 {
        /// Welding always compares position, so this alone is the set to
        /// pass for a purely geometric weld.
        const POSITION = 1 << 0;
        const NORMAL = 1 << 1;
        const TANGENT = 1 << 2;
        const COLOR = 1 << 3;
        const UV1 = 1 << 4;
        const UV2 = 1 << 5;
        const UV3 = 1 << 6;
        const UV4 = 1 << 7;
        const BONE_WEIGHT = 1 << 8;
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl AttributeSet {
    /// Iterate the contained channels in buffer order.
    pub fn channels(self) -> impl Iterator<Item = VertexAttribute> {
        VertexAttribute::ALL
            .into_iter()
            .filter(move |attribute| self.contains(attribute.flag()))
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, attribute) in self.channels().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{attribute}")?;
        }
        f.write_str("]")
    }
}
