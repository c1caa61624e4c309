//! Mass properties and the spatial inertia they assemble into.

use crate::linalg::{moment_tensor, skew, M3, V3};
use crate::spatial::{Spatial6, Spatial66};
use crate::units::UnitSystem;
use thiserror::Error;

/// `(mass, inertia tensor at CoM in body axes, CoM offset, declared unit
/// system)`. Two instances can only be [`combine`](MassProperties::combine)d
/// or [`remove`](MassProperties::remove)d when their unit systems agree.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassProperties {
    pub mass: f64,
    pub inertia_cg: M3,
    pub cg: V3,
    pub unit_system: UnitSystem,
}

/// Raised when [`MassProperties::combine`]/[`remove`] is asked to mix values
/// declared in different unit systems.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MassError {
    #[error("mass properties declared in different unit systems: {a:?} vs {b:?}")]
    UnitMismatch { a: UnitSystem, b: UnitSystem },
}

impl MassProperties {
    pub fn new(mass: f64, inertia_cg: M3, cg: V3, unit_system: UnitSystem) -> Self {
        Self {
            mass,
            inertia_cg,
            cg,
            unit_system,
        }
    }

    pub fn zero(unit_system: UnitSystem) -> Self {
        Self::new(0.0, M3::zeros(), V3::zeros(), unit_system)
    }

    /// Mass-weighted combination of `self` and `other`, per the parallel-axis
    /// combination rule:
    /// `m = m_a + m_b`, `c = (m_a c_a + m_b c_b) / m`,
    /// `I = I_a + m_a*MomentTensor(c_a) + I_b + m_b*MomentTensor(c_b) - m*MomentTensor(c)`.
    pub fn combine(&self, other: &MassProperties) -> Result<MassProperties, MassError> {
        self.check_units(other)?;
        let m = self.mass + other.mass;
        let c = if m > 0.0 {
            (self.cg * self.mass + other.cg * other.mass) / m
        } else {
            V3::zeros()
        };
        let inertia = self.inertia_cg
            + moment_tensor(self.cg) * self.mass
            + other.inertia_cg
            + moment_tensor(other.cg) * other.mass
            - moment_tensor(c) * m;
        Ok(MassProperties::new(m, inertia, c, self.unit_system))
    }

    /// Inverse of [`combine`](Self::combine): recovers `other` such that
    /// `self.remove(already_combined_other)` would return the original
    /// `self` this was combined from. Not validated for physical
    /// meaningfulness; it is the caller's responsibility to call this only
    /// where `other` is actually a sub-part of `self`.
    pub fn remove(&self, other: &MassProperties) -> Result<MassProperties, MassError> {
        self.check_units(other)?;
        let m = self.mass - other.mass;
        let c = if m.abs() > 0.0 {
            (self.cg * self.mass - other.cg * other.mass) / m
        } else {
            V3::zeros()
        };
        let inertia = self.inertia_cg + moment_tensor(self.cg) * self.mass
            - moment_tensor(c) * m
            - other.inertia_cg
            - moment_tensor(other.cg) * other.mass;
        Ok(MassProperties::new(m, inertia, c, self.unit_system))
    }

    fn check_units(&self, other: &MassProperties) -> Result<(), MassError> {
        if self.unit_system != other.unit_system {
            Err(MassError::UnitMismatch {
                a: self.unit_system,
                b: other.unit_system,
            })
        } else {
            Ok(())
        }
    }
}

/// `(m*g, cg_world x (m*g))`.
pub fn weight_wrench(m: f64, cg_world: V3, g: V3) -> Spatial6 {
    let force = g * m;
    Spatial6::new(force, cg_world.cross(&force))
}

/// `R * i_body_at_cg * R^T`.
pub fn world_inertia_at_cg(i_body_at_cg: M3, r_world: M3) -> M3 {
    r_world * i_body_at_cg * r_world.transpose()
}

/// A 6x6 block-symmetric spatial inertia assembled from mass, world-frame
/// inertia at CoM, and CoM offset, per:
///
/// ```text
/// I = [ m*E          -m*[c]x               ]
///     [ m*[c]x    I_C - m*[c]x*[c]x        ]
/// ```
pub struct SpatialInertiaMatrix;

impl SpatialInertiaMatrix {
    pub fn assemble(m: f64, i_cg_world: M3, c: V3) -> Spatial66 {
        let c_skew = skew(c);
        Spatial66 {
            a11: M3::identity() * m,
            a12: -c_skew * m,
            a21: c_skew * m,
            a22: i_cg_world - c_skew * c_skew * m,
        }
    }
}
