//! Extension functions over `nalgebra`'s `Vector3<f64>`, `Matrix3<f64>` and
//! `UnitQuaternion<f64>`.
//!
//! Kept as free functions rather than wrapper types so the crate gets
//! `nalgebra`'s own `Copy`, arithmetic and (optionally) `serde` impls for
//! free; this mirrors how the DH layer this crate grew out of used
//! `nalgebra` types directly instead of re-deriving a vector algebra.

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use thiserror::Error;

/// 3-vector. Passed by value everywhere in this crate -- it is `Copy`.
pub type V3 = Vector3<f64>;
/// 3x3 matrix.
pub type M3 = Matrix3<f64>;
/// Unit quaternion, scalar-first (`w + xi + yj + zk`) Hamilton convention.
pub type Q = UnitQuaternion<f64>;

/// Skew-symmetric cross-product matrix `[v]x`, such that `skew(v) * u == v.cross(&u)`.
pub fn skew(v: V3) -> M3 {
    M3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    )
}

/// `||v||^2 * E - v*v^T`, the moment-of-inertia contribution of a point mass
/// offset by `v` (parallel-axis theorem building block).
pub fn moment_tensor(v: V3) -> M3 {
    M3::identity() * v.norm_squared() - outer(v, v)
}

/// Outer product `a * b^T`.
pub fn outer(a: V3, b: V3) -> M3 {
    a * b.transpose()
}

/// Adjugate-based inverse; `None` when the matrix is (numerically) singular.
/// Never panics.
pub fn try_invert(m: M3) -> Option<M3> {
    m.try_inverse()
}

/// Raised only by call sites that specifically requested a matrix inverse
/// (e.g. an inverse-inertia query); routine forward evaluation never needs
/// this and so never returns it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("matrix is not invertible")]
    NonInvertible,
}

/// [`try_invert`], surfaced as a `Result` for callers that want the inverse
/// itself rather than an `Option`.
pub fn invert_checked(m: M3) -> Result<M3, NumericError> {
    try_invert(m).ok_or(NumericError::NonInvertible)
}

/// `(cos(angle/2), sin(angle/2)*axis)`. `axis` is assumed unit-length;
/// callers validate that at the model-building boundary via [`unit_axis`].
pub fn from_axis_angle(axis: V3, angle: f64) -> Q {
    Q::from_axis_angle(&nalgebra::Unit::new_unchecked(axis), angle)
}

/// Normalizes `v`, returning `None` for a (numerically) zero-magnitude
/// vector instead of producing a `NaN`-filled result.
pub fn unit_axis(v: V3) -> Option<V3> {
    let norm = v.norm();
    if norm <= f64::EPSILON {
        None
    } else {
        Some(v / norm)
    }
}

/// First-order quaternion integration step:
/// `q_{k+1} = normalize(q_k + 0.5*(omega_quat * q_k)*dt)`.
///
/// Falls back to `q` unchanged when the result would be degenerate (which
/// only happens if `q` itself is already degenerate, since a unit
/// quaternion plus a bounded perturbation cannot vanish for any step size
/// used in practice); see [`try_integrate_quaternion`] for the checked form.
pub fn integrate_quaternion(q: Q, omega: V3, dt: f64) -> Q {
    try_integrate_quaternion(q, omega, dt).unwrap_or(q)
}

/// Checked variant of [`integrate_quaternion`]. Returns `None` if the raw
/// quaternion sum has (numerically) zero magnitude and so cannot be
/// normalized.
pub fn try_integrate_quaternion(q: Q, omega: V3, dt: f64) -> Option<Q> {
    let omega_quat = Quaternion::from_parts(0.0, omega);
    let raw = q.into_inner() + omega_quat * q.into_inner() * 0.5 * dt;
    if raw.norm() <= f64::EPSILON {
        None
    } else {
        Some(UnitQuaternion::new_normalize(raw))
    }
}

/// Rotates `v` by `q`: `v + 2*qv x (qv x v + w*v)`.
pub fn rotate(q: Q, v: V3) -> V3 {
    q * v
}
