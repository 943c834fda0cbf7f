//! Tolerance matching and first-match deduplication.
//!
//! Matching is not transitive: a vertex within tolerance of two accepted
//! vertices that are not within tolerance of each other joins whichever was
//! accepted first. The accepted vertex keeps its own values, nothing is averaged.

use bevy::math::{Vec2, Vec3, Vec4};

use super::{VertexRecord, WeldSettings};

/// Result of [`deduplicate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deduplication {
    /// Accepted records, in order of first appearance.
    pub unique: Vec<VertexRecord>,
    /// For each original vertex, the index of its record in `unique`.
    pub vertex_map: Vec<u32>,
}

/// Scan `records` in order, merging each into the first earlier accepted
/// record it matches, or accepting it as a new unique vertex.
///
/// Runs in O(n * unique) time.
pub fn deduplicate(records: &[VertexRecord], settings: &WeldSettings) -> Deduplication {
    let mut unique: Vec<VertexRecord> = Vec::new();
    let mut vertex_map = Vec::with_capacity(records.len());

    for record in records {
        match unique
            .iter()
            .position(|candidate| tolerance_match(record, candidate, settings))
        {
            Some(existing) => vertex_map.push(existing as u32),
            None => {
                vertex_map.push(unique.len() as u32);
                unique.push(*record);
            }
        }
    }

    Deduplication { unique, vertex_map }
}

/// Whether `a` and `b` are duplicates under `settings`.
///
/// Position is always compared. Every other channel is compared only when
/// populated on both records.
pub fn tolerance_match(a: &VertexRecord, b: &VertexRecord, settings: &WeldSettings) -> bool {
    let position_delta = Vec3::from(a.position).distance_squared(Vec3::from(b.position));
    if position_delta > settings.max_position_delta {
        return false;
    }

    if let (Some(na), Some(nb)) = (a.normal, b.normal)
        && angle_degrees(Vec3::from(na), Vec3::from(nb)) > settings.max_angle_delta as f64
    {
        return false;
    }

    if let (Some(ta), Some(tb)) = (a.tangent, b.tangent) {
        let (ta, tb) = (Vec4::from(ta), Vec4::from(tb));
        // Handedness must match exactly
        if ta.w != tb.w || angle_degrees(ta.truncate(), tb.truncate()) > settings.max_angle_delta as f64
        {
            return false;
        }
    }

    if let (Some(ca), Some(cb)) = (a.color, b.color)
        && (Vec4::from(ca) - Vec4::from(cb)).abs().max_element() > settings.max_color_delta
    {
        return false;
    }

    for (ua, ub) in a.uvs.iter().zip(&b.uvs) {
        if let (Some(ua), Some(ub)) = (ua, ub)
            && Vec2::from(*ua).distance_squared(Vec2::from(*ub)) > settings.max_uv_delta
        {
            return false;
        }
    }

    if let (Some(wa), Some(wb)) = (a.bone_weight, b.bone_weight)
        && (!wa.same_joints(&wb) || wa.max_weight_delta(&wb) > settings.max_bone_weight_delta)
    {
        return false;
    }

    true
}

/// Angle between two directions in degrees. Zero-length vectors count as 0°.
fn angle_degrees(a: Vec3, b: Vec3) -> f64 {
    if a == b {
        return 0.0;
    }

    let (a, b) = (a.as_dvec3(), b.as_dvec3());
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }

    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos().to_degrees()
}
