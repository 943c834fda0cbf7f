//! Writing deduplicated vertices back into a mesh.

use bevy::prelude::*;

use super::VertexRecord;
use crate::mesh::{AttributeSet, MeshBuffers, VertexAttribute};

/// Replace every index `i` in every submesh with `vertex_map[i]`.
///
/// Submesh boundaries and triangle winding are preserved.
pub fn remap_indices(submeshes: &mut [Vec<u32>], vertex_map: &[u32]) {
    for indices in submeshes.iter_mut() {
        for index in indices.iter_mut() {
            *index = vertex_map[*index as usize];
        }
    }
}

/// Rebuild the position buffer and every buffer in `attributes` from `unique`.
///
/// Channels outside `attributes` keep their previous contents and may no longer
/// match the new vertex count.
pub fn assemble_buffers(mesh: &mut MeshBuffers, unique: &[VertexRecord], attributes: AttributeSet) {
    mesh.positions = unique.iter().map(|r| r.position).collect();

    for attribute in attributes.channels() {
        match attribute {
            VertexAttribute::Position => {}
            VertexAttribute::Normal => {
                mesh.normals = unique.iter().filter_map(|r| r.normal).collect();
            }
            VertexAttribute::Tangent => {
                mesh.tangents = unique.iter().filter_map(|r| r.tangent).collect();
            }
            VertexAttribute::Color => {
                mesh.colors = unique.iter().filter_map(|r| r.color).collect();
            }
            VertexAttribute::Uv1
            | VertexAttribute::Uv2
            | VertexAttribute::Uv3
            | VertexAttribute::Uv4 => {
                let Some(channel) = attribute.uv_channel() else {
                    continue;
                };
                mesh.uvs[channel] = unique.iter().filter_map(|r| r.uvs[channel]).collect();
            }
            VertexAttribute::BoneWeight => {
                mesh.bone_weights = unique.iter().filter_map(|r| r.bone_weight).collect();
            }
        }
    }

    let stale: AttributeSet = VertexAttribute::ALL
        .into_iter()
        .filter(|a| !attributes.contains(a.flag()) && mesh.buffer_len(*a) > 0)
        .map(VertexAttribute::flag)
        .collect();
    if !stale.is_empty() {
        debug!(
            "Weld left uncompared channels {} untouched; they no longer match {} vertices",
            stale,
            mesh.vertex_count()
        );
    }
}
