//! Combining several meshes into one, and the interface for stitching two
//! meshes along a shared boundary.
//!
//! # Example
//! ```
//! use bevy::math::{Affine3A, Vec3};
//! use bevy_mesh_weld::combine::{MeshPart, combine_and_weld};
//! use bevy_mesh_weld::mesh::{AttributeSet, MeshBuffers};
//! use bevy_mesh_weld::weld::WeldSettings;
//!
//! let cube = MeshBuffers::cube(0.5);
//! let parts = [
//!     MeshPart::new(&cube, Affine3A::IDENTITY),
//!     MeshPart::new(&cube, Affine3A::from_translation(Vec3::X)),
//! ];
//! let (combined, report) =
//!     combine_and_weld(&parts, AttributeSet::POSITION, &WeldSettings::default()).unwrap();
//! assert_eq!(report.welded_count, 12);
//! assert_eq!(combined.submeshes.len(), 1);
//! ```

use bevy::math::{Affine3A, Mat3A, Vec3};
use bevy::prelude::*;
use thiserror::Error;

use crate::mesh::{AttributeSet, BoneWeight, MeshBuffers, VertexAttribute};
use crate::weld::{WeldError, WeldReport, WeldSettings, validate_indices, weld};

/// World-space distance within which a vertex counts as lying on a mesh's
/// boundary along a stitch direction.
pub const BOUNDARY_TOLERANCE: f32 = 0.001;

/// A mesh and the transform that places it in world space.
#[derive(Clone, Copy, Debug)]
pub struct MeshPart<'a> {
    pub mesh: &'a MeshBuffers,
    pub transform: Affine3A,
}

impl<'a> MeshPart<'a> {
    pub fn new(mesh: &'a MeshBuffers, transform: Affine3A) -> Self {
        Self { mesh, transform }
    }

    pub fn from_transform(mesh: &'a MeshBuffers, transform: &Transform) -> Self {
        Self::new(mesh, transform.compute_affine())
    }
}

/// Merge `parts` into one mesh in world space.
///
/// Positions go through each part's transform, normals through its
/// inverse-transpose, tangents through its linear part. Normals and tangents are
/// renormalized, and tangent handedness flips under mirroring transforms.
///
/// A channel present on any part is present on the result; parts without it
/// contribute zero normals, tangents and UVs, white colors and default bone
/// weights. With `merge_submeshes` every triangle lands in one submesh,
/// otherwise each part's submeshes are appended in order.
pub fn combine_meshes(
    parts: &[MeshPart<'_>],
    merge_submeshes: bool,
) -> Result<MeshBuffers, WeldError> {
    let mut channels = AttributeSet::empty();
    for part in parts {
        check_lengths(part.mesh)?;
        validate_indices(part.mesh)?;
        channels |= part.mesh.attributes();
    }

    let mut combined = MeshBuffers::default();
    if merge_submeshes {
        combined.push_submesh(Vec::new());
    }

    for part in parts {
        let base = combined.vertex_count() as u32;
        append_vertices(&mut combined, part, channels);

        let offset = part.mesh.submeshes.iter().map(|s| s.iter().map(move |&i| i + base));
        if merge_submeshes {
            combined.submeshes[0].extend(offset.flatten());
        } else {
            combined.submeshes.extend(offset.map(Iterator::collect::<Vec<u32>>));
        }
    }

    debug!(
        "Combined {} meshes into {} vertices and {} submeshes",
        parts.len(),
        combined.vertex_count(),
        combined.submeshes.len()
    );
    Ok(combined)
}

/// Combine `parts` into a single submesh and weld the result.
pub fn combine_and_weld(
    parts: &[MeshPart<'_>],
    attributes: AttributeSet,
    settings: &WeldSettings,
) -> Result<(MeshBuffers, WeldReport), WeldError> {
    let mut combined = combine_meshes(parts, true)?;
    let report = weld(&mut combined, attributes, settings)?;
    Ok((combined, report))
}

fn check_lengths(mesh: &MeshBuffers) -> Result<(), WeldError> {
    let expected = mesh.vertex_count();
    for attribute in mesh.attributes().channels() {
        let len = mesh.buffer_len(attribute);
        if len != expected {
            return Err(WeldError::MalformedMesh {
                attribute,
                len,
                expected,
            });
        }
    }
    Ok(())
}

fn append_vertices(combined: &mut MeshBuffers, part: &MeshPart<'_>, channels: AttributeSet) {
    let mesh = part.mesh;
    let count = mesh.vertex_count();
    let linear = part.transform.matrix3;
    let inverse_transpose = normal_matrix(linear);
    let handedness = if linear.determinant() < 0.0 { -1.0 } else { 1.0 };
    let present = mesh.attributes();
    let has = |attribute: VertexAttribute| present.contains(attribute.flag());

    combined.positions.extend(
        mesh.positions
            .iter()
            .map(|p| part.transform.transform_point3(Vec3::from(*p)).to_array()),
    );

    if channels.contains(AttributeSet::NORMAL) {
        if has(VertexAttribute::Normal) {
            combined.normals.extend(mesh.normals.iter().map(|n| {
                inverse_transpose
                    .mul_vec3(Vec3::from(*n))
                    .normalize_or_zero()
                    .to_array()
            }));
        } else {
            combined.normals.extend(std::iter::repeat_n([0.0; 3], count));
        }
    }

    if channels.contains(AttributeSet::TANGENT) {
        if has(VertexAttribute::Tangent) {
            combined.tangents.extend(mesh.tangents.iter().map(|t| {
                let direction = part
                    .transform
                    .transform_vector3(Vec3::new(t[0], t[1], t[2]))
                    .normalize_or_zero();
                direction.extend(t[3] * handedness).to_array()
            }));
        } else {
            combined.tangents.extend(std::iter::repeat_n([0.0; 4], count));
        }
    }

    if channels.contains(AttributeSet::COLOR) {
        if has(VertexAttribute::Color) {
            combined.colors.extend_from_slice(&mesh.colors);
        } else {
            combined.colors.extend(std::iter::repeat_n([1.0; 4], count));
        }
    }

    for (channel, attribute) in VertexAttribute::UVS.into_iter().enumerate() {
        if !channels.contains(attribute.flag()) {
            continue;
        }
        if has(attribute) {
            combined.uvs[channel].extend_from_slice(&mesh.uvs[channel]);
        } else {
            combined.uvs[channel].extend(std::iter::repeat_n([0.0; 2], count));
        }
    }

    if channels.contains(AttributeSet::BONE_WEIGHT) {
        if has(VertexAttribute::BoneWeight) {
            combined.bone_weights.extend_from_slice(&mesh.bone_weights);
        } else {
            combined
                .bone_weights
                .extend(std::iter::repeat_n(BoneWeight::default(), count));
        }
    }
}

/// Inverse-transpose of `linear`, or `linear` itself when it is not invertible.
fn normal_matrix(linear: Mat3A) -> Mat3A {
    if linear.determinant().abs() <= f32::EPSILON {
        linear
    } else {
        linear.inverse().transpose()
    }
}

/// Errors reported by a [`BoundaryStitcher`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    #[error("Boundary loops differ in size: {a} vertices on the first mesh, {b} on the second")]
    EdgeCountMismatch { a: usize, b: usize },
}

/// Joins two meshes along their facing boundaries.
///
/// An implementation finds the vertices of each mesh that lie at the extremum
/// along `direction` (for `a`) and `-direction` (for `b`), within
/// [`BOUNDARY_TOLERANCE`] in world space, orders each set into a loop by
/// triangle adjacency, and moves each corresponding pair of boundary vertices
/// to their world-space midpoint. When the loops differ in size it must return
/// [`StitchError::EdgeCountMismatch`] and leave both meshes untouched.
///
/// The stitched meshes are typically passed to [`combine_and_weld`] afterwards.
pub trait BoundaryStitcher {
    fn stitch(
        &mut self,
        a: &mut MeshBuffers,
        a_transform: Affine3A,
        b: &mut MeshBuffers,
        b_transform: Affine3A,
        direction: Vec3,
    ) -> Result<(), StitchError>;
}
