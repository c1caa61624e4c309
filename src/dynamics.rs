//! The three-pass articulated-body dynamics core.

use crate::joint::Joint;
use crate::linalg::V3;
use crate::mass::{weight_wrench, world_inertia_at_cg, SpatialInertiaMatrix};
use crate::model::Model;
use crate::pose::Pose;
use crate::spatial::{cross_motion_force, cross_motion_motion, Spatial6, Spatial66};
use thiserror::Error;

/// `j_i` at or below this value marks a joint as (numerically) singular.
const EPS_SINGULAR: f64 = 1e-10;

/// `q`/`q_dot`/`tau` length mismatched against the model's joint count.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("array of length {got} does not match the model's {expected} joints")]
pub struct DimensionError {
    pub expected: usize,
    pub got: usize,
}

/// Failure surfaced by [`compute_accelerations`]. Never leaves any scratch
/// or caller state mutated on the error path.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DynamicsError {
    #[error("joint {joint} is kinematically singular (j <= {eps})", eps = EPS_SINGULAR)]
    SingularJoint { joint: usize },
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// Per-joint working arrays for the three-pass algorithm. Allocated once per
/// [`crate::integrator::Simulation`] and reused across every call to
/// [`compute_accelerations`] -- the rate function performs no heap
/// allocation in steady state.
pub struct DynamicsScratch {
    n: usize,
    t_world: Vec<Pose>,
    cg: Vec<V3>,
    s: Vec<Spatial6>,
    v: Vec<Spatial6>,
    kappa: Vec<Spatial6>,
    spi: Vec<Spatial66>,
    momentum: Vec<Spatial6>,
    bias_force: Vec<Spatial6>,
    weight: Vec<Spatial6>,
    art_inertia: Vec<Spatial66>,
    art_bias: Vec<Spatial6>,
    accel: Vec<Spatial6>,
    reaction: Vec<Spatial6>,
}

impl DynamicsScratch {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            t_world: vec![Pose::identity(); n],
            cg: vec![V3::zeros(); n],
            s: vec![Spatial6::zero(); n],
            v: vec![Spatial6::zero(); n],
            kappa: vec![Spatial6::zero(); n],
            spi: vec![Spatial66::zero(); n],
            momentum: vec![Spatial6::zero(); n],
            bias_force: vec![Spatial6::zero(); n],
            weight: vec![Spatial6::zero(); n],
            art_inertia: vec![Spatial66::zero(); n],
            art_bias: vec![Spatial6::zero(); n],
            accel: vec![Spatial6::zero(); n],
            reaction: vec![Spatial6::zero(); n],
        }
    }

    pub fn joint_count(&self) -> usize {
        self.n
    }

    /// Joint reaction wrench recorded by the last successful
    /// [`compute_accelerations`] call, expressed in the world frame.
    pub fn reaction(&self, joint: usize) -> Spatial6 {
        self.reaction[joint]
    }

    pub fn world_pose(&self, joint: usize) -> Pose {
        self.t_world[joint]
    }

    /// Body spatial velocity (twist) recorded for `joint` by the last
    /// successful [`compute_accelerations`] call.
    pub fn velocity(&self, joint: usize) -> Spatial6 {
        self.v[joint]
    }

    /// Motion subspace recorded for `joint` by the last successful
    /// [`compute_accelerations`] call.
    pub fn motion_subspace(&self, joint: usize) -> Spatial6 {
        self.s[joint]
    }

    /// Spatial inertia (not articulated) recorded for `joint`.
    pub fn spatial_inertia(&self, joint: usize) -> Spatial66 {
        self.spi[joint]
    }

    /// Gravitational weight wrench recorded for `joint`. A diagnostic value
    /// only -- gravity is injected once, via `a_ground` in Pass 3, and this
    /// is not added into `art_bias`.
    pub fn weight(&self, joint: usize) -> Spatial6 {
        self.weight[joint]
    }

    fn check_dims(&self, q: &[f64], q_dot: &[f64], tau: &[f64]) -> Result<(), DimensionError> {
        for got in [q.len(), q_dot.len(), tau.len()] {
            if got != self.n {
                return Err(DimensionError {
                    expected: self.n,
                    got,
                });
            }
        }
        Ok(())
    }
}

fn axis_world(pose: &Pose, local_axis: V3) -> V3 {
    crate::linalg::rotate(pose.orientation, local_axis)
}

/// Runs the three-pass articulated-body algorithm, writing `q_ddot` and the
/// intermediate arrays of `scratch`. Pure with respect to `model`; reads
/// `q`/`q_dot`/`tau`, writes only into `scratch` and `q_ddot`. On error,
/// `q_ddot` may be partially written but the caller-visible `Simulation`
/// state is never touched (that guarantee is the integrator's
/// responsibility, not this function's -- this function has no state of its
/// own beyond the scratch it owns).
pub fn compute_accelerations(
    model: &Model,
    scratch: &mut DynamicsScratch,
    q: &[f64],
    q_dot: &[f64],
    tau: &[f64],
    q_ddot: &mut [f64],
) -> Result<(), DynamicsError> {
    scratch.check_dims(q, q_dot, tau)?;
    if q_ddot.len() != scratch.n {
        return Err(DimensionError {
            expected: scratch.n,
            got: q_ddot.len(),
        }
        .into());
    }
    let n = scratch.n;
    let joints: &[Joint] = &model.joints;
    let gravity = model.gravity;

    // Pass 1: forward kinematics, i = 0 -> N-1.
    for i in 0..n {
        let joint = &joints[i];
        let (base_pose, base_velocity) = match model.parent[i] {
            Some(p) => (scratch.t_world[p], scratch.v[p]),
            None => (Pose::identity(), Spatial6::zero()),
        };

        let t_world = base_pose.compose(&joint.local_offset).compose(&joint.local_step(q[i]));
        let cg = t_world.position + crate::linalg::rotate(t_world.orientation, joint.mass_props.cg);
        let r_world = t_world.rotation_matrix();
        let i_world_cg = world_inertia_at_cg(joint.mass_props.inertia_cg, r_world);

        let axis = axis_world(&t_world, joint.local_axis);
        let s = joint.motion_subspace(axis, t_world.position);

        let joint_velocity = s * q_dot[i];
        let v = base_velocity + joint_velocity;
        let kappa = cross_motion_motion(v, joint_velocity);

        let spi = SpatialInertiaMatrix::assemble(joint.mass_props.mass, i_world_cg, cg);
        let momentum = spi.apply(v);
        let bias_force = cross_motion_force(v, momentum);
        let weight = weight_wrench(joint.mass_props.mass, cg, gravity);

        scratch.t_world[i] = t_world;
        scratch.cg[i] = cg;
        scratch.s[i] = s;
        scratch.v[i] = v;
        scratch.kappa[i] = kappa;
        scratch.spi[i] = spi;
        scratch.momentum[i] = momentum;
        scratch.bias_force[i] = bias_force;
        scratch.weight[i] = weight;
    }

    // Pass 2: articulated inertia/bias, i = N-1 -> 0.
    for i in (0..n).rev() {
        scratch.art_inertia[i] = scratch.spi[i];
        // Gravity enters once, through `a_ground` in Pass 3 below; `weight[i]`
        // is tracked only as a diagnostic (see `DynamicsScratch::weight`) and
        // must not also be folded in here, or gravity is applied twice.
        scratch.art_bias[i] = scratch.bias_force[i];

        for &child in &model.children[i] {
            let l_n = scratch.art_inertia[child].apply(scratch.s[child]);
            let j_n = scratch.s[child].dot(&l_n);
            if j_n.abs() <= EPS_SINGULAR {
                return Err(DynamicsError::SingularJoint { joint: child });
            }
            let t_n = l_n / j_n;
            let p_n = Spatial66::identity() - t_n.outer(&scratch.s[child]);

            scratch.art_inertia[i] += p_n.mul_mat(&scratch.art_inertia[child]);
            let residual = scratch.art_inertia[child].apply(scratch.kappa[child]) + scratch.art_bias[child];
            scratch.art_bias[i] += t_n * tau[child] + p_n.apply(residual);
        }
    }

    // Pass 3: forward acceleration, i = 0 -> N-1.
    let a_ground = Spatial6::new(-gravity, V3::zeros());
    for i in 0..n {
        let a_parent = match model.parent[i] {
            Some(p) => scratch.accel[p],
            None => a_ground,
        };
        let a_p = a_parent + scratch.kappa[i];

        let l_i = scratch.art_inertia[i].apply(scratch.s[i]);
        let j_i = scratch.s[i].dot(&l_i);
        if j_i.abs() <= EPS_SINGULAR {
            return Err(DynamicsError::SingularJoint { joint: i });
        }

        let rhs = scratch.art_inertia[i].apply(a_p) + scratch.art_bias[i];
        let qdd = (tau[i] - scratch.s[i].dot(&rhs)) / j_i;
        let accel = scratch.s[i] * qdd + a_p;
        scratch.reaction[i] = scratch.art_inertia[i].apply(accel) + scratch.art_bias[i];

        q_ddot[i] = qdd;
        scratch.accel[i] = accel;
    }

    Ok(())
}
