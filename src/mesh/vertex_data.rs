//! Per-vertex skinning data.

use bytemuck::{Pod, Zeroable};

/// Skeletal influence on a single vertex.
///
/// Up to 4 joints, matching Bevy's `ATTRIBUTE_JOINT_INDEX` (`Uint16x4`)
/// and `ATTRIBUTE_JOINT_WEIGHT` (`Float32x4`) layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BoneWeight {
    /// Joint indices into the skin's joint list.
    pub indices: [u16; 4],

    /// Influence of each joint. Usually sums to 1.0.
    pub weights: [f32; 4],
}

impl BoneWeight {
    /// Create a bone weight from explicit indices and weights.
    #[inline]
    pub const fn new(indices: [u16; 4], weights: [f32; 4]) -> Self {
        Self { indices, weights }
    }

    /// Fully bound to a single joint.
    ///
    /// # Example
    /// ```
    /// use bevy_mesh_weld::mesh::BoneWeight;
    ///
    /// let bw = BoneWeight::single(3);
    /// assert_eq!(bw.indices, [3, 0, 0, 0]);
    /// assert_eq!(bw.weights, [1.0, 0.0, 0.0, 0.0]);
    /// ```
    #[inline]
    pub const fn single(joint: u16) -> Self {
        Self {
            indices: [joint, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Whether both bone weights bind the same joints, slot by slot.
    #[inline]
    pub fn same_joints(&self, other: &Self) -> bool {
        self.indices == other.indices
    }

    /// Largest per-slot weight difference.
    pub fn max_weight_delta(&self, other: &Self) -> f32 {
        self.weights
            .iter()
            .zip(other.weights)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}
