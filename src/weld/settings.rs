//! Welding tolerances.

use bevy::prelude::*;

/// Tolerances used to decide whether two vertices are duplicates.
///
/// Inserted as a resource by [`MeshWeldPlugin`](crate::prelude::MeshWeldPlugin);
/// direct calls to [`weld`](super::weld) take it by reference.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct WeldSettings {
    /// Maximum *squared* distance between two positions.
    ///
    /// The squared distance is compared against this value as is, not against
    /// its square: `0.001` accepts positions roughly `0.0316` apart.
    /// Default: 0.001
    pub max_position_delta: f32,

    /// Maximum angle in degrees between normals, and between tangent directions.
    /// Default: 0.01
    pub max_angle_delta: f32,

    /// Maximum per-channel color difference.
    /// Default: 1/255
    pub max_color_delta: f32,

    /// Maximum squared distance between two UVs of the same channel.
    /// Default: 0.0001
    pub max_uv_delta: f32,

    /// Maximum per-slot bone weight difference. Joint indices must match exactly.
    /// Default: 0.01
    pub max_bone_weight_delta: f32,

    /// Fail with [`WeldError::AttributeUnavailable`](super::WeldError::AttributeUnavailable)
    /// when a requested channel is missing from the mesh, instead of leaving it
    /// out of the comparison.
    /// Default: false
    pub require_requested_attributes: bool,
}

impl Default for WeldSettings {
    fn default() -> Self {
        Self {
            max_position_delta: 0.001,
            max_angle_delta: 0.01,
            max_color_delta: 1.0 / 255.0,
            max_uv_delta: 0.0001,
            max_bone_weight_delta: 0.01,
            require_requested_attributes: false,
        }
    }
}

impl WeldSettings {
    pub fn with_max_position_delta(mut self, delta: f32) -> Self {
        self.max_position_delta = delta;
        self
    }

    pub fn with_max_angle_delta(mut self, degrees: f32) -> Self {
        self.max_angle_delta = degrees;
        self
    }

    pub fn with_max_color_delta(mut self, delta: f32) -> Self {
        self.max_color_delta = delta;
        self
    }

    pub fn with_max_uv_delta(mut self, delta: f32) -> Self {
        self.max_uv_delta = delta;
        self
    }

    pub fn with_max_bone_weight_delta(mut self, delta: f32) -> Self {
        self.max_bone_weight_delta = delta;
        self
    }

    pub fn with_require_requested_attributes(mut self, require: bool) -> Self {
        self.require_requested_attributes = require;
        self
    }
}
