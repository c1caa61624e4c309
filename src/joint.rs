//! Joint kinds and their local kinematic contribution.

use crate::linalg::{from_axis_angle, V3};
use crate::mass::MassProperties;
use crate::motor::Motor;
use crate::pose::Pose;
use crate::spatial::Spatial6;

/// The mechanical classification of a joint. Every kind has exactly one
/// degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JointKind {
    /// Rotation about `axis`, angle in radians.
    Revolute,
    /// Translation along `axis`, distance in meters.
    Prismatic,
    /// Coupled rotation + translation along `axis`, with translation per
    /// radian of rotation fixed by `pitch`.
    Screw,
}

/// A single degree of freedom plus its fixed mounting offset, mass
/// properties, motor, and initial condition. Owned by a [`crate::model::Model`]
/// in topological order; never referenced by pointer.
#[derive(Clone)]
pub struct Joint {
    pub kind: JointKind,
    /// Fixed transform from the parent joint's world pose to this joint's
    /// un-actuated frame.
    pub local_offset: Pose,
    /// Unit-length axis, expressed in the joint's local (un-actuated) frame.
    pub local_axis: V3,
    /// Screw pitch (translation per radian). `0.0` for Revolute,
    /// `f64::INFINITY` as a tag for Prismatic (never read for that kind).
    pub pitch: f64,
    pub mass_props: MassProperties,
    pub motor: Motor,
    pub initial_q: f64,
    pub initial_q_dot: f64,
}

impl Joint {
    /// The local step `Pose` for coordinate `q`, to be composed onto the
    /// parent's world pose after `local_offset`.
    pub fn local_step(&self, q: f64) -> Pose {
        match self.kind {
            JointKind::Revolute => Pose::new(V3::zeros(), from_axis_angle(self.local_axis, q)),
            JointKind::Prismatic => Pose::new(self.local_axis * q, crate::linalg::Q::identity()),
            JointKind::Screw => Pose::new(
                self.local_axis * (q * self.pitch),
                from_axis_angle(self.local_axis, q),
            ),
        }
    }

    /// The motion subspace `s`, expressed in the world frame at this
    /// joint's world top pose `(p, axis_world)`. `s . q_dot` is this
    /// joint's contribution to its child's spatial velocity.
    pub fn motion_subspace(&self, axis_world: V3, top_position: V3) -> Spatial6 {
        match self.kind {
            JointKind::Revolute => Spatial6::new(top_position.cross(&axis_world), axis_world),
            JointKind::Screw => Spatial6::new(
                axis_world * self.pitch + top_position.cross(&axis_world),
                axis_world,
            ),
            JointKind::Prismatic => Spatial6::new(axis_world, V3::zeros()),
        }
    }
}
