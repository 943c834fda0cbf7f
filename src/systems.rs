//! ECS surface for welding mesh assets.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::mesh::{AttributeSet, MeshWeldExt};
use crate::weld::WeldSettings;

/// System set for mesh weld systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeshWeldSystems;

/// Requests a one-off weld of the entity's [`Mesh3d`] asset.
///
/// Position is always compared; `attributes` adds further channels. The
/// component is removed once the weld has run.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct WeldVertices {
    pub attributes: AttributeSet,
}

impl WeldVertices {
    pub fn new(attributes: AttributeSet) -> Self {
        Self { attributes }
    }
}

/// Welds the mesh of every entity carrying [`WeldVertices`].
///
/// Meshes still loading are retried on the next run. A mesh that failed to
/// load or is gone from [`Assets<Mesh>`] drops the request, as does a failed
/// weld; both are logged.
pub fn weld_marked_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    asset_server: Option<Res<AssetServer>>,
    settings: Res<WeldSettings>,
    query: Query<(Entity, &Mesh3d, &WeldVertices)>,
) {
    for (entity, mesh3d, request) in &query {
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            match asset_server.as_ref().map(|server| server.load_state(mesh3d.0.id())) {
                Some(LoadState::Loading) => {}
                Some(LoadState::Failed(e)) => {
                    error!(
                        "Mesh of {} failed to load, dropping weld request: {}",
                        entity, e
                    );
                    commands.entity(entity).remove::<WeldVertices>();
                }
                _ => {
                    warn!(
                        "Mesh of {} is missing from Assets<Mesh>, dropping weld request",
                        entity
                    );
                    commands.entity(entity).remove::<WeldVertices>();
                }
            }
            continue;
        };

        match mesh.weld_vertices(request.attributes, &settings) {
            Ok(report) => {
                info!(
                    "Welded mesh of {}: {} -> {} vertices",
                    entity, report.original_count, report.welded_count
                );
            }
            Err(e) => {
                error!("Failed to weld mesh of {}: {}", entity, e);
            }
        }

        commands.entity(entity).remove::<WeldVertices>();
    }
}
