//! Pre-flight checks run before a weld touches the mesh.

use bevy::prelude::*;
use thiserror::Error;

use super::WeldSettings;
use crate::mesh::{AttributeSet, MeshBuffers, VertexAttribute};

/// Errors that can occur when welding a mesh.
///
/// Every variant is raised before the mesh is modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeldError {
    #[error("Mesh {attribute} buffer has {len} entries, expected {expected} to match positions")]
    MalformedMesh {
        attribute: VertexAttribute,
        len: usize,
        expected: usize,
    },

    #[error("Requested {attribute} comparison but the mesh has no {attribute} data")]
    AttributeUnavailable { attribute: VertexAttribute },

    #[error("Submesh {submesh} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        submesh: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Only triangle list meshes can be welded, got {topology}")]
    UnsupportedTopology { topology: String },

    #[error("Mesh attribute '{attribute}' has an unexpected vertex format")]
    UnexpectedFormat { attribute: &'static str },
}

/// Resolve the channels a weld compares: those both present on the mesh and
/// requested, plus position.
///
/// Fails if a compared buffer's length disagrees with the position buffer, or
/// if a requested channel is missing while
/// [`WeldSettings::require_requested_attributes`] is set. Otherwise missing
/// channels are dropped from the comparison.
pub fn resolve_attributes(
    mesh: &MeshBuffers,
    requested: AttributeSet,
    settings: &WeldSettings,
) -> Result<AttributeSet, WeldError> {
    let present = mesh.attributes();
    let requested = requested | AttributeSet::POSITION;

    for attribute in requested.channels() {
        if present.contains(attribute.flag()) {
            continue;
        }
        if settings.require_requested_attributes {
            return Err(WeldError::AttributeUnavailable { attribute });
        }
        debug!("Mesh has no {} data, skipping it during weld", attribute);
    }

    let effective = present & requested;
    let expected = mesh.vertex_count();
    for attribute in effective.channels() {
        let len = mesh.buffer_len(attribute);
        if len != expected {
            return Err(WeldError::MalformedMesh {
                attribute,
                len,
                expected,
            });
        }
    }

    Ok(effective)
}

/// Check that every submesh index references an existing vertex.
pub fn validate_indices(mesh: &MeshBuffers) -> Result<(), WeldError> {
    let vertex_count = mesh.vertex_count();
    for (submesh, indices) in mesh.submeshes.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(WeldError::IndexOutOfRange {
                submesh,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshBuffers {
        MeshBuffers::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .with_submesh(vec![0, 1, 2])
    }

    #[test]
    fn test_missing_attribute_is_dropped() {
        let mesh = triangle().with_normals(vec![[0.0, 0.0, 1.0]; 3]);
        let requested = AttributeSet::NORMAL | AttributeSet::COLOR;

        let effective = resolve_attributes(&mesh, requested, &WeldSettings::default()).unwrap();
        assert_eq!(effective, AttributeSet::POSITION | AttributeSet::NORMAL);
    }

    #[test]
    fn test_missing_attribute_strict() {
        let settings = WeldSettings::default().with_require_requested_attributes(true);
        let result = resolve_attributes(&triangle(), AttributeSet::UV2, &settings);
        assert_eq!(
            result,
            Err(WeldError::AttributeUnavailable {
                attribute: VertexAttribute::Uv2
            })
        );
    }

    #[test]
    fn test_malformed_compared_buffer() {
        let mesh = triangle().with_colors(vec![[1.0; 4]; 2]);
        let result = resolve_attributes(&mesh, AttributeSet::COLOR, &WeldSettings::default());
        assert_eq!(
            result,
            Err(WeldError::MalformedMesh {
                attribute: VertexAttribute::Color,
                len: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn test_malformed_unrequested_buffer_is_ignored() {
        let mesh = triangle().with_colors(vec![[1.0; 4]; 5]);
        let effective =
            resolve_attributes(&mesh, AttributeSet::POSITION, &WeldSettings::default()).unwrap();
        assert_eq!(effective, AttributeSet::POSITION);
    }

    #[test]
    fn test_index_out_of_range() {
        let mesh = triangle().with_submesh(vec![0, 1, 3]);
        assert_eq!(
            validate_indices(&mesh),
            Err(WeldError::IndexOutOfRange {
                submesh: 1,
                index: 3,
                vertex_count: 3,
            })
        );
        assert!(validate_indices(&triangle()).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = WeldError::MalformedMesh {
            attribute: VertexAttribute::Tangent,
            len: 4,
            expected: 8,
        };
        assert_eq!(
            err.to_string(),
            "Mesh tangent buffer has 4 entries, expected 8 to match positions"
        );
    }
}
