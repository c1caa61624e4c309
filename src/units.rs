//! Unit conversion, used only at model-ingress boundaries.
//!
//! The dynamics core never calls [`UnitSystem::convert`] mid-step; it always
//! runs in one canonical (SI) system once a `Model` is built.

/// The physical quantities a [`UnitSystem`] knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Length,
    Mass,
    MassMomentOfInertia,
    Force,
    Torque,
    Acceleration,
}

/// A unit system expressed as SI-relative scale factors. `length_scale = 1.0`
/// means "one unit of length in this system is one meter", etc.
///
/// Equality is used only to detect whether two [`crate::mass::MassProperties`]
/// values were declared in the same system; it is not a semantic "these
/// systems are physically equivalent" check (two systems with accidentally
/// identical factors compare equal, which is the desired behavior here).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSystem {
    pub length_scale: f64,
    pub mass_scale: f64,
    pub time_scale: f64,
}

impl UnitSystem {
    pub fn new(length_scale: f64, mass_scale: f64, time_scale: f64) -> Self {
        Self {
            length_scale,
            mass_scale,
            time_scale,
        }
    }

    /// The canonical system: meters, kilograms, seconds.
    pub fn si() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Scale factor to multiply a value expressed in `from` to obtain the
    /// equivalent value expressed in `to`, for the given `quantity`.
    pub fn convert(&self, quantity: Quantity, from: UnitSystem, to: UnitSystem) -> f64 {
        let (l_ratio, m_ratio, t_ratio) = (
            from.length_scale / to.length_scale,
            from.mass_scale / to.mass_scale,
            from.time_scale / to.time_scale,
        );
        match quantity {
            Quantity::Length => l_ratio,
            Quantity::Mass => m_ratio,
            Quantity::MassMomentOfInertia => m_ratio * l_ratio * l_ratio,
            Quantity::Force => m_ratio * l_ratio / (t_ratio * t_ratio),
            Quantity::Torque => m_ratio * l_ratio * l_ratio / (t_ratio * t_ratio),
            Quantity::Acceleration => l_ratio / (t_ratio * t_ratio),
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::si()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn si_to_si_is_identity() {
        let si = UnitSystem::si();
        assert_relative_eq!(si.convert(Quantity::Length, si, si), 1.0);
        assert_relative_eq!(si.convert(Quantity::Force, si, si), 1.0);
    }

    #[test]
    fn millimeter_to_meter_length() {
        let mm = UnitSystem::new(1e-3, 1.0, 1.0);
        let si = UnitSystem::si();
        assert_relative_eq!(si.convert(Quantity::Length, mm, si), 1e-3, epsilon = 1e-15);
    }

    #[test]
    fn inertia_scales_with_length_squared() {
        let mm = UnitSystem::new(1e-3, 1.0, 1.0);
        let si = UnitSystem::si();
        assert_relative_eq!(
            si.convert(Quantity::MassMomentOfInertia, mm, si),
            1e-6,
            epsilon = 1e-18
        );
    }
}
