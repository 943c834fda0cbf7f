//! # bevy_mesh_weld
//!
//! Tolerance-based vertex welding for Bevy meshes.
//!
//! Welding merges vertices that are equal within tolerance across a chosen set
//! of attribute channels, shrinks the vertex buffers and rewrites the index
//! buffers to match.
//!
//! ## Features
//!
//! - Per-channel comparison: position, normal, tangent, color, 4 UV channels, bone weights
//! - Independent tolerance per channel via [`WeldSettings`](weld::WeldSettings)
//! - Multiple submeshes sharing one vertex buffer
//! - The first vertex seen in a group is kept as is, nothing is averaged
//! - Bevy [`Mesh`](bevy::mesh::Mesh) support and an ECS component to weld mesh assets
//! - Combining several transformed meshes before welding
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_mesh_weld::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(MeshWeldPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
//!     // Weld on position and normal; the cube keeps its hard edges
//!     commands.spawn((
//!         Mesh3d(meshes.add(Cuboid::default())),
//!         WeldVertices::new(AttributeSet::NORMAL),
//!     ));
//! }
//! ```

pub mod combine;
pub mod mesh;
mod plugin;
pub mod systems;
pub mod weld;

pub mod prelude {
    pub use crate::combine::{
        BoundaryStitcher, MeshPart, StitchError, combine_and_weld, combine_meshes,
    };
    pub use crate::mesh::{
        ATTRIBUTE_UV_2, ATTRIBUTE_UV_3, AttributeSet, BoneWeight, MeshBuffers, MeshWeldExt,
        VertexAttribute,
    };
    pub use crate::plugin::MeshWeldPlugin;
    pub use crate::systems::{MeshWeldSystems, WeldVertices};
    pub use crate::weld::{WeldError, WeldReport, WeldSettings, weld};
}
