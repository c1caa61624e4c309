//! Joint actuation models, evaluated to a scalar generalized force/torque.

use std::fmt;
use std::sync::Arc;

/// A closed sum type of actuation models. Composed by plain arithmetic over
/// the scalar each variant evaluates to (see [`Motor::Scaled`]) rather than
/// a bare function-pointer delegate.
#[derive(Clone)]
pub enum Motor {
    /// A fixed generalized force/torque, independent of state.
    Constant(f64),
    /// `tau = preload - stiffness*q - damping*q_dot`.
    Spring {
        stiffness: f64,
        damping: f64,
        preload: f64,
    },
    /// An arbitrary function of simulation time.
    FunctionOfTime(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
    /// `parent.eval(..) * factor`.
    Scaled { parent: Box<Motor>, factor: f64 },
}

impl Motor {
    pub fn eval(&self, t: f64, q: f64, q_dot: f64) -> f64 {
        match self {
            Motor::Constant(tau) => *tau,
            Motor::Spring {
                stiffness,
                damping,
                preload,
            } => preload - stiffness * q - damping * q_dot,
            Motor::FunctionOfTime(f) => f(t),
            Motor::Scaled { parent, factor } => parent.eval(t, q, q_dot) * factor,
        }
    }
}

impl fmt::Debug for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motor::Constant(tau) => f.debug_tuple("Constant").field(tau).finish(),
            Motor::Spring {
                stiffness,
                damping,
                preload,
            } => f
                .debug_struct("Spring")
                .field("stiffness", stiffness)
                .field("damping", damping)
                .field("preload", preload)
                .finish(),
            Motor::FunctionOfTime(_) => f.write_str("FunctionOfTime(..)"),
            Motor::Scaled { parent, factor } => f
                .debug_struct("Scaled")
                .field("parent", parent)
                .field("factor", factor)
                .finish(),
        }
    }
}
