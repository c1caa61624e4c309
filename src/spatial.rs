//! Spatial (6-D screw) vectors and 6x6 block matrices.
//!
//! Species -- twist or wrench -- is not encoded in the representation; it is
//! fixed by which named operation a call site uses. This collapses what the
//! DH layer's teacher project would have modeled as two near-duplicate
//! vector types into a single storage with explicit-intent free functions.

use crate::linalg::{outer, M3, V3};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A 6-vector `(linear, angular)`. Used to store either a twist (spatial
/// velocity / acceleration) or a wrench (spatial force), per call site.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spatial6 {
    pub linear: V3,
    pub angular: V3,
}

impl Spatial6 {
    pub fn new(linear: V3, angular: V3) -> Self {
        Self { linear, angular }
    }

    pub fn zero() -> Self {
        Self::new(V3::zeros(), V3::zeros())
    }

    /// Pairing `twist . wrench = linear_t . linear_w + angular_t . angular_w`.
    pub fn dot(&self, other: &Spatial6) -> f64 {
        self.linear.dot(&other.linear) + self.angular.dot(&other.angular)
    }

    /// Outer product, producing a [`Spatial66`]:
    /// `[[a_l b_l^T, a_l b_a^T], [a_a b_l^T, a_a b_a^T]]`.
    pub fn outer(&self, other: &Spatial6) -> Spatial66 {
        Spatial66 {
            a11: outer(self.linear, other.linear),
            a12: outer(self.linear, other.angular),
            a21: outer(self.angular, other.linear),
            a22: outer(self.angular, other.angular),
        }
    }
}

impl Add for Spatial6 {
    type Output = Spatial6;
    fn add(self, rhs: Spatial6) -> Spatial6 {
        Spatial6::new(self.linear + rhs.linear, self.angular + rhs.angular)
    }
}

impl AddAssign for Spatial6 {
    fn add_assign(&mut self, rhs: Spatial6) {
        self.linear += rhs.linear;
        self.angular += rhs.angular;
    }
}

impl Sub for Spatial6 {
    type Output = Spatial6;
    fn sub(self, rhs: Spatial6) -> Spatial6 {
        Spatial6::new(self.linear - rhs.linear, self.angular - rhs.angular)
    }
}

impl Mul<f64> for Spatial6 {
    type Output = Spatial6;
    fn mul(self, rhs: f64) -> Spatial6 {
        Spatial6::new(self.linear * rhs, self.angular * rhs)
    }
}

impl Div<f64> for Spatial6 {
    type Output = Spatial6;
    fn div(self, rhs: f64) -> Spatial6 {
        Spatial6::new(self.linear / rhs, self.angular / rhs)
    }
}

/// `a`, `b` are both twists; the result is a twist.
///
/// `( a.angular x b.linear + a.linear x b.angular , a.angular x b.angular )`
pub fn cross_motion_motion(a: Spatial6, b: Spatial6) -> Spatial6 {
    Spatial6::new(
        a.angular.cross(&b.linear) + a.linear.cross(&b.angular),
        a.angular.cross(&b.angular),
    )
}

/// `v` is a twist, `w` is a wrench; the result is a wrench.
///
/// `( v.angular x w.linear , v.angular x w.angular + v.linear x w.linear )`
pub fn cross_motion_force(v: Spatial6, w: Spatial6) -> Spatial6 {
    Spatial6::new(
        v.angular.cross(&w.linear),
        v.angular.cross(&w.angular) + v.linear.cross(&w.linear),
    )
}

/// A 6x6 block matrix built from four 3x3 blocks:
/// `[[a11, a12], [a21, a22]]`. Used for spatial inertias and articulated
/// inertias; not assumed symmetric (Pass 2's projector is not).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spatial66 {
    pub a11: M3,
    pub a12: M3,
    pub a21: M3,
    pub a22: M3,
}

impl Spatial66 {
    pub fn zero() -> Self {
        Self {
            a11: M3::zeros(),
            a12: M3::zeros(),
            a21: M3::zeros(),
            a22: M3::zeros(),
        }
    }

    pub fn identity() -> Self {
        Self {
            a11: M3::identity(),
            a12: M3::zeros(),
            a21: M3::zeros(),
            a22: M3::identity(),
        }
    }

    /// Block-product against a 6-vector:
    /// `result.linear = a11*x.linear + a12*x.angular`,
    /// `result.angular = a21*x.linear + a22*x.angular`.
    pub fn apply(&self, x: Spatial6) -> Spatial6 {
        Spatial6::new(
            self.a11 * x.linear + self.a12 * x.angular,
            self.a21 * x.linear + self.a22 * x.angular,
        )
    }

    /// Block-product against another 6x6 block matrix.
    pub fn mul_mat(&self, rhs: &Spatial66) -> Spatial66 {
        Spatial66 {
            a11: self.a11 * rhs.a11 + self.a12 * rhs.a21,
            a12: self.a11 * rhs.a12 + self.a12 * rhs.a22,
            a21: self.a21 * rhs.a11 + self.a22 * rhs.a21,
            a22: self.a21 * rhs.a12 + self.a22 * rhs.a22,
        }
    }

    /// Transpose obtained by transposing each block in place (not swapping
    /// the off-diagonal blocks) -- used by the symmetry test in §8, which
    /// compares a spatial inertia against its "swap-blocks-and-transpose".
    pub fn swap_blocks_and_transpose(&self) -> Spatial66 {
        Spatial66 {
            a11: self.a11.transpose(),
            a12: self.a21.transpose(),
            a21: self.a12.transpose(),
            a22: self.a22.transpose(),
        }
    }
}

impl Add for Spatial66 {
    type Output = Spatial66;
    fn add(self, rhs: Spatial66) -> Spatial66 {
        Spatial66 {
            a11: self.a11 + rhs.a11,
            a12: self.a12 + rhs.a12,
            a21: self.a21 + rhs.a21,
            a22: self.a22 + rhs.a22,
        }
    }
}

impl AddAssign for Spatial66 {
    fn add_assign(&mut self, rhs: Spatial66) {
        self.a11 += rhs.a11;
        self.a12 += rhs.a12;
        self.a21 += rhs.a21;
        self.a22 += rhs.a22;
    }
}

impl Sub for Spatial66 {
    type Output = Spatial66;
    fn sub(self, rhs: Spatial66) -> Spatial66 {
        Spatial66 {
            a11: self.a11 - rhs.a11,
            a12: self.a12 - rhs.a12,
            a21: self.a21 - rhs.a21,
            a22: self.a22 - rhs.a22,
        }
    }
}

impl Mul<f64> for Spatial66 {
    type Output = Spatial66;
    fn mul(self, rhs: f64) -> Spatial66 {
        Spatial66 {
            a11: self.a11 * rhs,
            a12: self.a12 * rhs,
            a21: self.a21 * rhs,
            a22: self.a22 * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(seed: f64) -> Spatial6 {
        Spatial6::new(
            V3::new(seed, 2.0 * seed, -seed),
            V3::new(-seed, seed * 0.5, seed),
        )
    }

    #[test]
    fn cross_motion_motion_is_antisymmetric() {
        let a = sample(1.3);
        let b = sample(-0.4);
        let ab = cross_motion_motion(a, b);
        let ba = cross_motion_motion(b, a);
        assert_relative_eq!(ab.linear, -ba.linear, epsilon = 1e-12);
        assert_relative_eq!(ab.angular, -ba.angular, epsilon = 1e-12);
    }

    #[test]
    fn block_apply_matches_hand_expansion() {
        let m = Spatial66 {
            a11: M3::new(1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0),
            a12: M3::zeros(),
            a21: M3::zeros(),
            a22: M3::identity(),
        };
        let x = sample(1.0);
        let result = m.apply(x);
        assert_relative_eq!(result.linear, V3::new(x.linear.x, 2.0 * x.linear.y, 3.0 * x.linear.z));
        assert_relative_eq!(result.angular, x.angular);
    }

    #[test]
    fn identity_block_matrix_is_neutral() {
        let x = sample(0.77);
        assert_relative_eq!(Spatial66::identity().apply(x).linear, x.linear, epsilon = 1e-12);
        assert_relative_eq!(Spatial66::identity().apply(x).angular, x.angular, epsilon = 1e-12);
    }
}
