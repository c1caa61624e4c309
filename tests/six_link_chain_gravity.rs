//! Scenario 4: a serial 6-link chain, gravity loaded. The tip stays at a
//! finite height after 1s and the Pass-3 torque-balance residual
//! (`tau[i] - s[i] . reaction[i]`, which the algorithm solves to exactly
//! zero by construction) stays within tolerance at every recorded step.

use nalgebra::{Matrix3, Vector3};
use spatial_dynamics::{
    compute_accelerations, DynamicsScratch, IntegratorKind, MassProperties, Model, ModelBuilder,
    Motor, Pose, Simulation, SimulationConfig, UnitSystem,
};

fn six_link_chain() -> Model {
    let gravity = Vector3::new(0.0, 0.0, -9.81);
    let mut builder = ModelBuilder::new(gravity);
    let link_offset = Pose::new(Vector3::new(0.3, 0.0, 0.0), nalgebra::UnitQuaternion::identity());

    let mut parent = None;
    for link in 0..6 {
        let offset = if link == 0 { Pose::identity() } else { link_offset };
        let handle = builder
            .add_revolute(parent, offset, Vector3::new(0.0, 1.0, 0.0))
            .unwrap();
        builder
            .set_mass_properties(
                handle,
                MassProperties::new(
                    0.5,
                    Matrix3::identity() * 0.01,
                    Vector3::new(0.15, 0.0, 0.0),
                    UnitSystem::si(),
                ),
            )
            .unwrap();
        builder.set_motor(handle, Motor::Constant(0.0)).unwrap();
        builder.set_initial_conditions(handle, 0.05 * link as f64, 0.0).unwrap();
        parent = Some(handle);
    }

    builder.build().unwrap()
}

fn residuals(model: &Model, q: &[f64], q_dot: &[f64]) -> Vec<f64> {
    let n = model.joint_count();
    let mut scratch = DynamicsScratch::new(n);
    let tau = vec![0.0; n];
    let mut q_ddot = vec![0.0; n];
    compute_accelerations(model, &mut scratch, q, q_dot, &tau, &mut q_ddot).unwrap();

    (0..n)
        .map(|i| tau[i] - scratch.motion_subspace(i).dot(&scratch.reaction(i)))
        .collect()
}

#[test]
fn tip_height_finite_and_residual_within_tolerance() {
    let model = six_link_chain();
    let config = SimulationConfig {
        integrator: IntegratorKind::Rk4,
        gravity: model.gravity(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(model, config).unwrap();
    sim.run_to(1.0, 500).unwrap();

    for entry in sim.history() {
        for r in residuals(sim.model(), &entry.q, &entry.q_dot) {
            assert!(r.abs() <= 1e-8, "torque-balance residual {} exceeds tolerance", r);
        }
    }

    let (q, _) = sim.current();
    for &qi in q {
        assert!(qi.is_finite(), "joint angle diverged to non-finite value");
    }
}
