//! Scenario 1: a single free mass on a prismatic joint, falling under
//! gravity. Closed form: `q(t) = q0 + q0_dot*t + 0.5*g*t^2`.

use nalgebra::Vector3;
use spatial_dynamics::{IntegratorKind, MassProperties, Model, ModelBuilder, Pose, Simulation, SimulationConfig, UnitSystem};

fn build_model(gravity: Vector3<f64>) -> Model {
    let mut builder = ModelBuilder::new(gravity);
    let joint = builder
        .add_prismatic(None, Pose::identity(), Vector3::new(0.0, 0.0, 1.0))
        .unwrap();
    builder
        .set_mass_properties(
            joint,
            MassProperties::new(3.0, nalgebra::Matrix3::identity(), Vector3::zeros(), UnitSystem::si()),
        )
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn matches_closed_form_at_one_second() {
    let g = -9.81;
    let model = build_model(Vector3::new(0.0, 0.0, g));
    let config = SimulationConfig {
        integrator: IntegratorKind::Rk4,
        gravity: model.gravity(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(model, config).unwrap();

    let dt = 0.05;
    let steps = (1.0 / dt).round() as usize;
    sim.run_to(1.0, steps).unwrap();

    let (q, q_dot) = sim.current();
    let expected_q = 0.5 * g * 1.0 * 1.0;
    let expected_q_dot = g * 1.0;

    assert!((q[0] - expected_q).abs() < 1e-6, "q = {} vs {}", q[0], expected_q);
    assert!(
        (q_dot[0] - expected_q_dot).abs() < 1e-6,
        "q_dot = {} vs {}",
        q_dot[0],
        expected_q_dot
    );
}
