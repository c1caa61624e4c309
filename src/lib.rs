//! Forward-dynamics engine for tree-structured articulated rigid-body
//! systems: a spatial-algebra substrate, a three-pass articulated-body
//! dynamics core, and a fixed-step integrator.
//!
//! ```
//! use spatial_dynamics::{ModelBuilder, Pose, Simulation, SimulationConfig};
//! use nalgebra::Vector3;
//!
//! let mut builder = ModelBuilder::new(Vector3::new(0.0, 0.0, -9.81));
//! let joint = builder
//!     .add_revolute(None, Pose::identity(), Vector3::new(0.0, 0.0, 1.0))
//!     .unwrap();
//! let model = builder.build().unwrap();
//! let mut sim = Simulation::new(model, SimulationConfig::default()).unwrap();
//! sim.integrate(0.001).unwrap();
//! let _ = joint;
//! ```

mod dynamics;
mod integrator;
mod joint;
mod linalg;
mod mass;
mod model;
mod motor;
mod pose;
mod spatial;
mod units;

pub use dynamics::{compute_accelerations, DimensionError, DynamicsError, DynamicsScratch};
pub use integrator::{HistoryEntry, IntegratorKind, Simulation, SimulationConfig, SimulationError};
pub use joint::{Joint, JointKind};
pub use mass::{MassError, MassProperties, SpatialInertiaMatrix};
pub use model::{JointHandle, Model, ModelBuilder, ModelError};
pub use motor::Motor;
pub use pose::Pose;
pub use spatial::{cross_motion_force, cross_motion_motion, Spatial6, Spatial66};
pub use units::{Quantity, UnitSystem};

pub use linalg::NumericError;
