//! Fixed-step integration driver.

use crate::dynamics::{compute_accelerations, DynamicsError, DynamicsScratch};
use crate::model::Model;
use crate::units::UnitSystem;
use nalgebra::Vector3;
use thiserror::Error;

/// Tolerance for the gravity-agreement check in [`Simulation::new`].
const GRAVITY_TOLERANCE: f64 = 1e-9;

/// Raised by [`Simulation::new`] when `config` disagrees with the `Model` it
/// is being paired with. The dynamics core always reads gravity from the
/// `Model` itself (never from `SimulationConfig`), so a mismatch here would
/// otherwise be a silent trap: the caller's declared gravity/unit system
/// would simply be ignored.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SimulationError {
    #[error("config gravity {config:?} disagrees with the model's gravity {model:?}")]
    GravityMismatch {
        config: Vector3<f64>,
        model: Vector3<f64>,
    },
    #[error(
        "joint {joint} mass properties were declared in {got:?}, but the \
         config's default unit system is {expected:?}"
    )]
    UnitSystemMismatch {
        joint: usize,
        expected: UnitSystem,
        got: UnitSystem,
    },
}

/// Which rate-function evaluation scheme [`Simulation::integrate`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegratorKind {
    /// One rate evaluation per step.
    Euler,
    /// Classical four-stage Runge-Kutta.
    Rk4,
}

/// Recognized configuration for a [`Simulation`]. `serde`-optional so a host
/// application can load it from whatever format it likes; this crate never
/// parses a config file itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub integrator: IntegratorKind,
    pub default_unit_system: UnitSystem,
    pub gravity: Vector3<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::Rk4,
            default_unit_system: UnitSystem::si(),
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }
}

/// One recorded simulation state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub t: f64,
    pub q: Vec<f64>,
    pub q_dot: Vec<f64>,
}

/// Torque/force supplied to each joint at a given `(t, q, q_dot)`. Evaluated
/// once per rate-function call.
fn joint_torques(model: &Model, t: f64, q: &[f64], q_dot: &[f64]) -> Vec<f64> {
    model
        .joints
        .iter()
        .zip(q.iter())
        .zip(q_dot.iter())
        .map(|((joint, &qi), &qdi)| joint.motor.eval(t, qi, qdi))
        .collect()
}

/// Owns a frozen [`Model`], the current integration state, reusable
/// dynamics scratch, and an append-only history. `&mut`-borrowed by exactly
/// one caller at a time; ordinary borrow-checking is the only
/// synchronization this type needs.
pub struct Simulation {
    model: Model,
    config: SimulationConfig,
    scratch: DynamicsScratch,
    t: f64,
    q: Vec<f64>,
    q_dot: Vec<f64>,
    q0: Vec<f64>,
    q_dot0: Vec<f64>,
    history: Vec<HistoryEntry>,
}

impl Simulation {
    /// Builds a `Simulation` from an already-frozen `Model` and a
    /// `SimulationConfig`. Validates that `config` actually agrees with
    /// `model` before accepting either: `config.gravity` must match
    /// `model.gravity()` within [`GRAVITY_TOLERANCE`], and every joint's
    /// declared `MassProperties::unit_system` must match
    /// `config.default_unit_system`. Both fields describe the world the
    /// model was built in; this crate does not support silently overriding
    /// a built model's physical constants from the side.
    pub fn new(model: Model, config: SimulationConfig) -> Result<Self, SimulationError> {
        if (config.gravity - model.gravity()).norm() > GRAVITY_TOLERANCE {
            return Err(SimulationError::GravityMismatch {
                config: config.gravity,
                model: model.gravity(),
            });
        }
        for (i, joint) in model.joints.iter().enumerate() {
            if joint.mass_props.unit_system != config.default_unit_system {
                return Err(SimulationError::UnitSystemMismatch {
                    joint: i,
                    expected: config.default_unit_system,
                    got: joint.mass_props.unit_system,
                });
            }
        }

        let n = model.joint_count();
        let (q0, q_dot0) = model.initial_state();
        let scratch = DynamicsScratch::new(n);
        Ok(Self {
            t: 0.0,
            q: q0.clone(),
            q_dot: q_dot0.clone(),
            q0,
            q_dot0,
            model,
            config,
            scratch,
            history: Vec::new(),
        })
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn current(&self) -> (&[f64], &[f64]) {
        (&self.q, &self.q_dot)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The dynamics scratch as of the last successful [`integrate`](Self::integrate)
    /// sub-step's last internal rate evaluation -- exposed read-only so
    /// callers can inspect per-joint velocities, reactions, and spatial
    /// inertias without re-deriving them.
    pub fn scratch(&self) -> &DynamicsScratch {
        &self.scratch
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Restores `t`, `q`, `q_dot` to their values at construction and clears
    /// history; the underlying `Model` and scratch allocation are untouched.
    pub fn reset(&mut self) {
        self.t = 0.0;
        self.q = self.q0.clone();
        self.q_dot = self.q_dot0.clone();
        self.history.clear();
    }

    fn rate(&mut self, t: f64, q: &[f64], q_dot: &[f64]) -> Result<(Vec<f64>, Vec<f64>), DynamicsError> {
        let tau = joint_torques(&self.model, t, q, q_dot);
        let mut q_ddot = vec![0.0; self.model.joint_count()];
        compute_accelerations(&self.model, &mut self.scratch, q, q_dot, &tau, &mut q_ddot)?;
        Ok((q_dot.to_vec(), q_ddot))
    }

    fn step_euler(&mut self, dt: f64) -> Result<(Vec<f64>, Vec<f64>), DynamicsError> {
        let (dq, dq_dot) = self.rate(self.t, &self.q, &self.q_dot)?;
        let q_next: Vec<f64> = self.q.iter().zip(&dq).map(|(q, d)| q + d * dt).collect();
        let q_dot_next: Vec<f64> = self
            .q_dot
            .iter()
            .zip(&dq_dot)
            .map(|(qd, d)| qd + d * dt)
            .collect();
        Ok((q_next, q_dot_next))
    }

    fn step_rk4(&mut self, dt: f64) -> Result<(Vec<f64>, Vec<f64>), DynamicsError> {
        let n = self.model.joint_count();
        let t0 = self.t;
        let q0 = self.q.clone();
        let q_dot0 = self.q_dot.clone();

        let (k1_q, k1_v) = self.rate(t0, &q0, &q_dot0)?;

        let combine = |base: &[f64], k: &[f64], scale: f64| -> Vec<f64> {
            (0..n).map(|i| base[i] + k[i] * scale).collect()
        };

        let q2 = combine(&q0, &k1_q, 0.5 * dt);
        let v2 = combine(&q_dot0, &k1_v, 0.5 * dt);
        let (k2_q, k2_v) = self.rate(t0 + 0.5 * dt, &q2, &v2)?;

        let q3 = combine(&q0, &k2_q, 0.5 * dt);
        let v3 = combine(&q_dot0, &k2_v, 0.5 * dt);
        let (k3_q, k3_v) = self.rate(t0 + 0.5 * dt, &q3, &v3)?;

        let q4 = combine(&q0, &k3_q, dt);
        let v4 = combine(&q_dot0, &k3_v, dt);
        let (k4_q, k4_v) = self.rate(t0 + dt, &q4, &v4)?;

        let q_next: Vec<f64> = (0..n)
            .map(|i| {
                q0[i] + dt / 6.0 * (k1_q[i] + 2.0 * k2_q[i] + 2.0 * k3_q[i] + k4_q[i])
            })
            .collect();
        let q_dot_next: Vec<f64> = (0..n)
            .map(|i| {
                q_dot0[i] + dt / 6.0 * (k1_v[i] + 2.0 * k2_v[i] + 2.0 * k3_v[i] + k4_v[i])
            })
            .collect();

        Ok((q_next, q_dot_next))
    }

    /// Advances the simulation by `dt`, committing the new `(q, q_dot)`, `t`,
    /// and a history entry only after a successful rate evaluation. On
    /// failure, `t`/`q`/`q_dot`/`history` are left exactly as they were.
    pub fn integrate(&mut self, dt: f64) -> Result<(), DynamicsError> {
        let (q_next, q_dot_next) = match self.config.integrator {
            IntegratorKind::Euler => self.step_euler(dt)?,
            IntegratorKind::Rk4 => self.step_rk4(dt)?,
        };

        self.q = q_next;
        self.q_dot = q_dot_next;
        self.t += dt;
        self.history.push(HistoryEntry {
            t: self.t,
            q: self.q.clone(),
            q_dot: self.q_dot.clone(),
        });
        Ok(())
    }

    /// Subdivides `[self.time(), t_end]` into `n_steps` equal sub-steps,
    /// shortening the final sub-step so the simulation lands exactly on
    /// `t_end`. Stops and returns the error on the first failing sub-step,
    /// leaving every prior committed sub-step in place.
    pub fn run_to(&mut self, t_end: f64, n_steps: usize) -> Result<(), DynamicsError> {
        if n_steps == 0 {
            return Ok(());
        }
        let span = t_end - self.t;
        let dt = span / n_steps as f64;
        for step in 0..n_steps {
            let this_dt = if step + 1 == n_steps {
                t_end - self.t
            } else {
                dt
            };
            self.integrate(this_dt)?;
        }
        Ok(())
    }
}
