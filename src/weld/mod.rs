//! Tolerance-based vertex welding.
//!
//! A weld runs these stages in order, each taking the previous stage's output:
//! - [`resolve_attributes`] and [`validate_indices`]: decide what to compare, reject malformed input
//! - [`build_records`]: snapshot each vertex
//! - [`deduplicate`]: first-match merge into unique records and a vertex map
//! - [`remap_indices`]: rewrite submesh indices through the map
//! - [`assemble_buffers`]: rebuild the vertex buffers from the unique records
//!
//! [`weld`] runs the whole pipeline.

mod assemble;
mod dedup;
mod record;
mod settings;
mod validation;

pub use assemble::{assemble_buffers, remap_indices};
pub use dedup::{Deduplication, deduplicate, tolerance_match};
pub use record::{VertexRecord, build_records};
pub use settings::WeldSettings;
pub use validation::{WeldError, resolve_attributes, validate_indices};

use bevy::prelude::*;

use crate::mesh::{AttributeSet, MeshBuffers};

/// Summary of a completed weld.
#[derive(Clone, Debug, PartialEq)]
pub struct WeldReport {
    pub original_count: usize,
    pub welded_count: usize,
    /// Channels that took part in the comparison, position included.
    pub compared: AttributeSet,
    /// For each original vertex, its index in the welded mesh.
    pub vertex_map: Vec<u32>,
}

impl WeldReport {
    pub fn removed_count(&self) -> usize {
        self.original_count - self.welded_count
    }
}

/// Merge duplicate vertices of `mesh` in place.
///
/// Position is always compared. Channels in `attributes` are compared as well
/// when the mesh has them. After a successful weld the position buffer and every
/// compared buffer hold one entry per unique vertex, in order of first
/// appearance, and all submesh indices reference them.
///
/// On error the mesh is left unmodified.
///
/// # Example
/// ```
/// use bevy_mesh_weld::mesh::{AttributeSet, MeshBuffers};
/// use bevy_mesh_weld::weld::{WeldSettings, weld};
///
/// let mut cube = MeshBuffers::cube(1.0);
/// let report = weld(&mut cube, AttributeSet::POSITION, &WeldSettings::default()).unwrap();
/// assert_eq!(report.welded_count, 8);
/// ```
pub fn weld(
    mesh: &mut MeshBuffers,
    attributes: AttributeSet,
    settings: &WeldSettings,
) -> Result<WeldReport, WeldError> {
    let compared = resolve_attributes(mesh, attributes, settings)?;
    validate_indices(mesh)?;

    let records = build_records(mesh, compared);
    let Deduplication { unique, vertex_map } = deduplicate(&records, settings);

    remap_indices(&mut mesh.submeshes, &vertex_map);
    assemble_buffers(mesh, &unique, compared);

    let report = WeldReport {
        original_count: records.len(),
        welded_count: unique.len(),
        compared,
        vertex_map,
    };
    debug!(
        "Welded {} vertices into {} comparing {}",
        report.original_count, report.welded_count, report.compared
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::BoneWeight;

    fn index_range_ok(mesh: &MeshBuffers) -> bool {
        mesh.submeshes
            .iter()
            .flatten()
            .all(|&i| (i as usize) < mesh.vertex_count())
    }

    /// Two triangles sharing an edge, with the shared vertices duplicated.
    fn quad_with_seam() -> MeshBuffers {
        MeshBuffers::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
        .with_uvs(
            0,
            vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.5, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
            ],
        )
        .with_submesh(vec![0, 1, 2, 3, 4, 5])
    }

    #[test]
    fn test_cube_position_only() {
        let mut cube = MeshBuffers::cube(1.0);
        let report = weld(&mut cube, AttributeSet::POSITION, &WeldSettings::default()).unwrap();

        assert_eq!(report.original_count, 24);
        assert_eq!(report.welded_count, 8);
        assert_eq!(report.removed_count(), 16);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.submeshes[0].iter().all(|&i| i < 8));
        // Normals were not compared and keep their original 24 entries
        assert_eq!(cube.normals.len(), 24);
    }

    #[test]
    fn test_cube_with_normals_stays_split() {
        let mut cube = MeshBuffers::cube(1.0);
        let original = cube.clone();
        let report = weld(
            &mut cube,
            AttributeSet::NORMAL,
            &WeldSettings::default(),
        )
        .unwrap();

        assert_eq!(report.welded_count, 24);
        assert_eq!(cube.positions, original.positions);
        assert_eq!(cube.submeshes, original.submeshes);
    }

    #[test]
    fn test_attribute_selection_changes_result() {
        let settings = WeldSettings::default();

        let mut with_uv = quad_with_seam();
        weld(&mut with_uv, AttributeSet::UV1, &settings).unwrap();
        // Vertex 3 differs from vertex 0 in UV only
        assert_eq!(with_uv.vertex_count(), 5);
        assert_eq!(with_uv.uvs[0].len(), 5);

        let mut without_uv = quad_with_seam();
        weld(&mut without_uv, AttributeSet::POSITION, &settings).unwrap();
        assert_eq!(without_uv.vertex_count(), 4);
        assert_eq!(without_uv.submeshes[0], vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_idempotent() {
        let settings = WeldSettings::default();
        let attributes = AttributeSet::UV1 | AttributeSet::TANGENT;
        let mut cube = MeshBuffers::cube(0.5);
        weld(&mut cube, attributes, &settings).unwrap();
        let once = cube.clone();

        let report = weld(&mut cube, attributes, &settings).unwrap();
        assert_eq!(report.welded_count, report.original_count);
        assert!(report.vertex_map.iter().enumerate().all(|(i, &m)| m as usize == i));
        assert_eq!(cube, once);
    }

    #[test]
    fn test_retained_vertices_are_original_bytes() {
        let settings = WeldSettings::default();
        let mut mesh = MeshBuffers::new(vec![
            [0.0, 0.0, 0.0],
            [0.001, 0.0, 0.0],
            [0.0, 0.002, 0.0],
            [2.0, 0.0, 0.0],
            [2.01, 0.0, 0.0],
        ])
        .with_colors(vec![
            [1.0, 0.0, 0.0, 1.0],
            [1.0, 0.001, 0.0, 1.0],
            [0.999, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 1.0, 0.001, 1.0],
        ])
        .with_submesh(vec![0, 1, 2, 2, 3, 4]);
        let original = mesh.clone();

        weld(&mut mesh, AttributeSet::COLOR, &settings).unwrap();
        assert_eq!(mesh.vertex_count(), 2);

        for (position, color) in mesh.positions.iter().zip(&mesh.colors) {
            let found = original.positions.iter().zip(&original.colors).any(|(p, c)| {
                bytemuck::bytes_of(p) == bytemuck::bytes_of(position)
                    && bytemuck::bytes_of(c) == bytemuck::bytes_of(color)
            });
            assert!(found, "welded vertex {position:?} is not an original vertex");
        }
        assert!(index_range_ok(&mesh));
    }

    #[test]
    fn test_multiple_submeshes_remapped() {
        let mut mesh = MeshBuffers::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ])
        .with_submesh(vec![0, 1, 2])
        .with_submesh(vec![3, 5, 4]);

        weld(&mut mesh, AttributeSet::POSITION, &WeldSettings::default()).unwrap();
        assert_eq!(mesh.submeshes, vec![vec![0, 1, 2], vec![1, 3, 2]]);
    }

    #[test]
    fn test_skinned_vertices_split_by_joint() {
        let mut mesh = MeshBuffers::new(vec![[0.0; 3]; 3])
            .with_bone_weights(vec![
                BoneWeight::single(0),
                BoneWeight::single(1),
                BoneWeight::new([0, 0, 0, 0], [0.995, 0.005, 0.0, 0.0]),
            ])
            .with_submesh(vec![0, 1, 2]);

        let report = weld(
            &mut mesh,
            AttributeSet::BONE_WEIGHT,
            &WeldSettings::default(),
        )
        .unwrap();

        assert_eq!(report.vertex_map, vec![0, 1, 0]);
        assert_eq!(mesh.bone_weights, vec![BoneWeight::single(0), BoneWeight::single(1)]);
    }

    #[test]
    fn test_malformed_mesh_not_mutated() {
        let mut mesh = quad_with_seam().with_normals(vec![[0.0, 0.0, 1.0]; 4]);
        let original = mesh.clone();

        let result = weld(
            &mut mesh,
            AttributeSet::NORMAL,
            &WeldSettings::default(),
        );
        assert!(matches!(result, Err(WeldError::MalformedMesh { .. })));
        assert_eq!(mesh, original);
    }

    #[test]
    fn test_bad_index_not_mutated() {
        let mut mesh = quad_with_seam().with_submesh(vec![0, 1, 9]);
        let original = mesh.clone();

        let result = weld(&mut mesh, AttributeSet::POSITION, &WeldSettings::default());
        assert!(matches!(result, Err(WeldError::IndexOutOfRange { index: 9, .. })));
        assert_eq!(mesh, original);
    }

    #[test]
    fn test_count_never_grows() {
        let settings = WeldSettings::default();
        let positions: Vec<[f32; 3]> = (0..60)
            .map(|i| {
                let t = i as f32;
                [(t * 0.37).sin(), (t * 0.11).cos(), ((i % 7) as f32) * 0.01]
            })
            .collect();
        let indices: Vec<u32> = (0..60).collect();
        let mut mesh = MeshBuffers::new(positions).with_submesh(indices);

        let report = weld(&mut mesh, AttributeSet::POSITION, &settings).unwrap();
        assert!(report.welded_count <= report.original_count);
        assert!(index_range_ok(&mesh));
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = MeshBuffers::default();
        let report = weld(&mut mesh, AttributeSet::all(), &WeldSettings::default()).unwrap();
        assert_eq!(report.welded_count, 0);
        assert_eq!(report.compared, AttributeSet::POSITION);
    }
}
