//! Scenario 2: a single pendulum released at a small angle. Linearized
//! small-angle period is `T = 2*pi*sqrt(L/g)`; after one period the joint
//! angle should return close to its starting value.

use nalgebra::{Matrix3, Vector3};
use spatial_dynamics::{IntegratorKind, MassProperties, Model, ModelBuilder, Pose, Simulation, SimulationConfig, UnitSystem};

const LENGTH: f64 = 1.0;
const G: f64 = 9.81;

fn pendulum_model() -> Model {
    let gravity = Vector3::new(0.0, 0.0, -G);
    let mut builder = ModelBuilder::new(gravity);
    let joint = builder
        .add_revolute(None, Pose::identity(), Vector3::new(0.0, 1.0, 0.0))
        .unwrap();
    builder
        .set_mass_properties(
            joint,
            MassProperties::new(
                1.0,
                Matrix3::zeros(),
                Vector3::new(0.0, 0.0, -LENGTH),
                UnitSystem::si(),
            ),
        )
        .unwrap();
    builder.set_initial_conditions(joint, 0.1, 0.0).unwrap();
    builder.build().unwrap()
}

#[test]
fn period_matches_linearized_closed_form() {
    let model = pendulum_model();
    let config = SimulationConfig {
        integrator: IntegratorKind::Rk4,
        gravity: model.gravity(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(model, config).unwrap();

    let period = 2.0 * std::f64::consts::PI * (LENGTH / G).sqrt();
    let dt = 1e-3;
    let steps = (period / dt).round() as usize;
    sim.run_to(period, steps).unwrap();

    let (q, _) = sim.current();
    let amplitude = 0.1;
    assert!(
        (q[0] - amplitude).abs() < 0.01,
        "q after one period = {} (expected near {})",
        q[0],
        amplitude
    );
}
