//! Welds a tiled plane and two touching cubes, then renders them.
//!
//! The plane is built with 4 vertices per tile, so neighbouring tiles
//! duplicate their shared corners. Welding on position, normal and UV merges
//! them. The cubes are combined into one mesh and welded the same way; their
//! touching faces point in opposite directions and stay apart.

use bevy::prelude::*;
use bevy_mesh_weld::prelude::*;

const TILES: u32 = 8;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(MeshWeldPlugin)
        .add_systems(Startup, setup)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<WeldSettings>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.7, 0.6),
        ..default()
    });

    // Welded by the plugin on the first update
    commands.spawn((
        Mesh3d(meshes.add(tiled_plane(TILES).to_mesh())),
        MeshMaterial3d(material.clone()),
        WeldVertices::new(AttributeSet::NORMAL | AttributeSet::UV1),
    ));

    // Welded up front
    let cube = MeshBuffers::cube(0.5);
    let parts = [
        MeshPart::from_transform(&cube, &Transform::from_xyz(-0.5, 0.5, 0.0)),
        MeshPart::from_transform(&cube, &Transform::from_xyz(0.5, 0.5, 0.0)),
    ];
    let attributes = AttributeSet::NORMAL | AttributeSet::TANGENT | AttributeSet::UV1;
    match combine_and_weld(&parts, attributes, &settings) {
        Ok((combined, report)) => {
            info!(
                "Combined cubes: {} -> {} vertices",
                report.original_count, report.welded_count
            );
            commands.spawn((
                Mesh3d(meshes.add(combined.to_mesh())),
                MeshMaterial3d(material),
            ));
        }
        Err(e) => error!("Failed to combine cubes: {}", e),
    }

    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-4.0, 5.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// A flat `tiles` x `tiles` grid on the XZ plane with unshared tile corners.
fn tiled_plane(tiles: u32) -> MeshBuffers {
    let half = tiles as f32 * 0.5;
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for z in 0..tiles {
        for x in 0..tiles {
            let base = positions.len() as u32;
            for (dx, dz) in [(0, 0), (0, 1), (1, 1), (1, 0)] {
                let (px, pz) = ((x + dx) as f32, (z + dz) as f32);
                positions.push([px - half, 0.0, pz - half]);
                uvs.push([px / tiles as f32, pz / tiles as f32]);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    let count = positions.len();
    MeshBuffers::new(positions)
        .with_normals(vec![[0.0, 1.0, 0.0]; count])
        .with_uvs(0, uvs)
        .with_submesh(indices)
}
