//! Plugin for welding mesh assets from the ECS.
use bevy::prelude::*;

use crate::systems::{MeshWeldSystems, weld_marked_meshes};
use crate::weld::WeldSettings;

/// Plugin that welds meshes of entities marked with
/// [`WeldVertices`](crate::systems::WeldVertices).
///
/// This plugin registers:
/// - [`WeldSettings`] as a resource, unless one was inserted already
/// - [`weld_marked_meshes`] in `Update`, inside [`MeshWeldSystems`]
///
/// # Example
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_mesh_weld::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .insert_resource(WeldSettings::default().with_max_position_delta(0.0001))
///     .add_plugins(MeshWeldPlugin)
///     .run();
/// ```
pub struct MeshWeldPlugin;

impl Plugin for MeshWeldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeldSettings>()
            .add_systems(Update, weld_marked_meshes.in_set(MeshWeldSystems));
    }
}
