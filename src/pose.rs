//! Rigid transform: a position plus an orientation.
//!
//! Mirrors the DH layer's own `Pose` (position + rotation) but stores the
//! orientation as a unit quaternion instead of a rotation matrix, per the
//! spatial-algebra substrate this crate is built around.

use crate::linalg::{rotate, M3, Q, V3};

/// A rigid transform `(position, orientation)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: V3,
    pub orientation: Q,
}

impl Pose {
    pub fn new(position: V3, orientation: Q) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn identity() -> Self {
        Self {
            position: V3::zeros(),
            orientation: Q::identity(),
        }
    }

    /// Composition `self . other`: `position = p_self + rotate(q_self,
    /// p_other)`, `orientation = q_self * q_other`.
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose {
            position: self.position + rotate(self.orientation, other.position),
            orientation: self.orientation * other.orientation,
        }
    }

    /// Inverse transform: `(-rotate(q^-1, p), q^-1)`.
    pub fn inverse(&self) -> Pose {
        let inv_q = self.orientation.inverse();
        Pose {
            position: -rotate(inv_q, self.position),
            orientation: inv_q,
        }
    }

    /// World-frame rotation matrix of this pose's orientation.
    pub fn rotation_matrix(&self) -> M3 {
        self.orientation.to_rotation_matrix().into_inner()
    }

    /// Re-normalizes the orientation in place; called after every
    /// integration step so drift never accumulates across a long run.
    pub fn renormalize(&mut self) {
        self.orientation = Q::new_normalize(self.orientation.into_inner());
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::identity()
    }
}
