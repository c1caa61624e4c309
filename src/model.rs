//! Builder for a tree of joints, and the frozen, topologically-ordered
//! model it produces.

use crate::joint::{Joint, JointKind};
use crate::linalg::{unit_axis, V3};
use crate::mass::MassProperties;
use crate::motor::Motor;
use crate::pose::Pose;
use thiserror::Error;

/// A handle to a joint added via [`ModelBuilder`]. Only ever produced by
/// `add_revolute`/`add_prismatic`/`add_screw`, which always append -- so an
/// in-range handle can never reference a not-yet-added joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) usize);

impl JointHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Failures raised while building or re-addressing a [`Model`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ModelError {
    #[error("joint parent handle does not refer to an already-added joint")]
    DanglingParent,
    #[error("joint axis has zero (or non-finite) magnitude")]
    DegenerateAxis,
    #[error("joint axis magnitude {magnitude} for joint {joint} was re-normalized past tolerance")]
    NonUnitAxis { joint: usize, magnitude: f64 },
    #[error("joint handle {0:?} does not refer to a joint in this model")]
    UnknownJoint(JointHandle),
}

struct PendingJoint {
    kind: JointKind,
    parent: Option<JointHandle>,
    local_offset: Pose,
    local_axis: V3,
    pitch: f64,
    mass_props: MassProperties,
    motor: Motor,
    initial_q: f64,
    initial_q_dot: f64,
}

/// Axis re-normalization above this relative deviation from unit length is
/// reported via [`ModelError::NonUnitAxis`] even though the builder still
/// normalizes and proceeds.
const AXIS_TOLERANCE: f64 = 1e-6;

/// Mutably accumulates joints, then freezes into a [`Model`]. Never itself
/// used by the dynamics core.
pub struct ModelBuilder {
    gravity: V3,
    pending: Vec<PendingJoint>,
    axis_warnings: Vec<ModelError>,
}

impl ModelBuilder {
    pub fn new(gravity: V3) -> Self {
        Self {
            gravity,
            pending: Vec::new(),
            axis_warnings: Vec::new(),
        }
    }

    pub fn add_revolute(
        &mut self,
        parent: Option<JointHandle>,
        local_offset: Pose,
        axis: V3,
    ) -> Result<JointHandle, ModelError> {
        self.add(JointKind::Revolute, parent, local_offset, axis, 0.0)
    }

    pub fn add_prismatic(
        &mut self,
        parent: Option<JointHandle>,
        local_offset: Pose,
        axis: V3,
    ) -> Result<JointHandle, ModelError> {
        self.add(
            JointKind::Prismatic,
            parent,
            local_offset,
            axis,
            f64::INFINITY,
        )
    }

    pub fn add_screw(
        &mut self,
        parent: Option<JointHandle>,
        local_offset: Pose,
        axis: V3,
        pitch: f64,
    ) -> Result<JointHandle, ModelError> {
        self.add(JointKind::Screw, parent, local_offset, axis, pitch)
    }

    fn add(
        &mut self,
        kind: JointKind,
        parent: Option<JointHandle>,
        local_offset: Pose,
        axis: V3,
        pitch: f64,
    ) -> Result<JointHandle, ModelError> {
        if let Some(p) = parent {
            if p.0 >= self.pending.len() {
                return Err(ModelError::DanglingParent);
            }
        }
        let magnitude = axis.norm();
        let normalized = unit_axis(axis).ok_or(ModelError::DegenerateAxis)?;
        if (magnitude - 1.0).abs() > AXIS_TOLERANCE {
            let joint_index = self.pending.len();
            self.axis_warnings.push(ModelError::NonUnitAxis {
                joint: joint_index,
                magnitude,
            });
        }

        let handle = JointHandle(self.pending.len());
        self.pending.push(PendingJoint {
            kind,
            parent,
            local_offset,
            local_axis: normalized,
            pitch,
            mass_props: MassProperties::zero(crate::units::UnitSystem::si()),
            motor: Motor::Constant(0.0),
            initial_q: 0.0,
            initial_q_dot: 0.0,
        });
        Ok(handle)
    }

    pub fn set_mass_properties(
        &mut self,
        handle: JointHandle,
        mp: MassProperties,
    ) -> Result<(), ModelError> {
        self.pending
            .get_mut(handle.0)
            .ok_or(ModelError::UnknownJoint(handle))?
            .mass_props = mp;
        Ok(())
    }

    pub fn set_motor(&mut self, handle: JointHandle, motor: Motor) -> Result<(), ModelError> {
        self.pending
            .get_mut(handle.0)
            .ok_or(ModelError::UnknownJoint(handle))?
            .motor = motor;
        Ok(())
    }

    pub fn set_initial_conditions(
        &mut self,
        handle: JointHandle,
        q0: f64,
        q0_dot: f64,
    ) -> Result<(), ModelError> {
        let joint = self
            .pending
            .get_mut(handle.0)
            .ok_or(ModelError::UnknownJoint(handle))?;
        joint.initial_q = q0;
        joint.initial_q_dot = q0_dot;
        Ok(())
    }

    /// Freezes the accumulated joints into a [`Model`]. The tree invariant
    /// (every parent strictly before its children, graph is a tree) holds by
    /// construction since handles are only ever produced by `add_*`, which
    /// always appends -- this does not re-scan for cycles.
    pub fn build(self) -> Result<Model, ModelError> {
        if let Some(first) = self.axis_warnings.first() {
            return Err(*first);
        }
        let n = self.pending.len();
        let mut parent = vec![None; n];
        let mut children = vec![Vec::new(); n];
        let mut joints = Vec::with_capacity(n);

        for (i, p) in self.pending.into_iter().enumerate() {
            parent[i] = p.parent.map(|h| h.0);
            if let Some(parent_index) = parent[i] {
                children[parent_index].push(i);
            }
            joints.push(Joint {
                kind: p.kind,
                local_offset: p.local_offset,
                local_axis: p.local_axis,
                pitch: p.pitch,
                mass_props: p.mass_props,
                motor: p.motor,
                initial_q: p.initial_q,
                initial_q_dot: p.initial_q_dot,
            });
        }

        Ok(Model {
            joints,
            parent,
            children,
            gravity: self.gravity,
        })
    }
}

/// An immutable, topologically-ordered tree of joints. Parents always
/// precede their children (`parent[i] < i` whenever `parent[i]` is `Some`).
pub struct Model {
    pub(crate) joints: Vec<Joint>,
    pub(crate) parent: Vec<Option<usize>>,
    pub(crate) children: Vec<Vec<usize>>,
    pub(crate) gravity: V3,
}

impl Model {
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joint(&self, handle: JointHandle) -> Option<&Joint> {
        self.joints.get(handle.0)
    }

    pub fn parent_of(&self, handle: JointHandle) -> Option<usize> {
        self.parent.get(handle.0).copied().flatten()
    }

    pub fn gravity(&self) -> V3 {
        self.gravity
    }

    pub fn initial_state(&self) -> (Vec<f64>, Vec<f64>) {
        let q = self.joints.iter().map(|j| j.initial_q).collect();
        let q_dot = self.joints.iter().map(|j| j.initial_q_dot).collect();
        (q, q_dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_revolute_builds() {
        let mut b = ModelBuilder::new(V3::new(0.0, 0.0, -9.81));
        let h = b
            .add_revolute(None, Pose::identity(), V3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(h.index(), 0);
        let model = b.build().unwrap();
        assert_eq!(model.joint_count(), 1);
        assert_eq!(model.parent_of(h), None);
    }

    #[test]
    fn chain_tracks_children() {
        let mut b = ModelBuilder::new(V3::zeros());
        let root = b
            .add_revolute(None, Pose::identity(), V3::new(0.0, 0.0, 1.0))
            .unwrap();
        let child = b
            .add_prismatic(Some(root), Pose::identity(), V3::new(1.0, 0.0, 0.0))
            .unwrap();
        let model = b.build().unwrap();
        assert_eq!(model.children[root.index()], vec![child.index()]);
        assert_eq!(model.parent_of(child), Some(root.index()));
    }

    #[test]
    fn dangling_parent_is_rejected() {
        let mut b = ModelBuilder::new(V3::zeros());
        let fake = JointHandle(7);
        let err = b
            .add_revolute(Some(fake), Pose::identity(), V3::new(0.0, 0.0, 1.0))
            .unwrap_err();
        assert_eq!(err, ModelError::DanglingParent);
    }

    #[test]
    fn zero_length_axis_is_rejected() {
        let mut b = ModelBuilder::new(V3::zeros());
        let err = b
            .add_revolute(None, Pose::identity(), V3::zeros())
            .unwrap_err();
        assert_eq!(err, ModelError::DegenerateAxis);
    }

    #[test]
    fn unknown_joint_handle_rejected_after_build_setup() {
        let mut b = ModelBuilder::new(V3::zeros());
        let fake = JointHandle(3);
        let err = b
            .set_motor(fake, Motor::Constant(1.0))
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownJoint(fake));
    }
}
