//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between the continuous world and the
//! integer sample lattice used by field caches.

use glam::{DVec3, IVec3};

/// Floor the value and clamp it into the `i32` domain.
///
/// Non-finite values map to zero so a corrupt position cannot produce an
/// arbitrary lattice coordinate.
///
/// # Examples
///
/// ```
/// use fieldwalk::numeric::floor_to_i32;
/// assert_eq!(floor_to_i32(-0.5), -1);
/// assert_eq!(floor_to_i32(2.9), 2);
/// assert_eq!(floor_to_i32(f64::NAN), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn floor_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let floored = value.floor();
    let clamped = floored.clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    clamped as i32
}

/// Returns the lattice cell containing `position`.
///
/// # Examples
///
/// ```
/// use fieldwalk::numeric::grid_cell;
/// use glam::{DVec3, IVec3};
/// assert_eq!(grid_cell(DVec3::new(1.5, -0.25, 3.0)), IVec3::new(1, -1, 3));
/// ```
#[must_use]
pub fn grid_cell(position: DVec3) -> IVec3 {
    IVec3::new(
        floor_to_i32(position.x),
        floor_to_i32(position.y),
        floor_to_i32(position.z),
    )
}

/// Component-wise `a + b`, or `None` when any axis overflows.
///
/// # Examples
///
/// ```
/// use fieldwalk::numeric::checked_add;
/// use glam::IVec3;
/// assert_eq!(checked_add(IVec3::ONE, IVec3::NEG_ONE), Some(IVec3::ZERO));
/// assert_eq!(checked_add(IVec3::splat(i32::MAX), IVec3::X), None);
/// ```
#[must_use]
pub fn checked_add(a: IVec3, b: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        a.x.checked_add(b.x)?,
        a.y.checked_add(b.y)?,
        a.z.checked_add(b.z)?,
    ))
}

/// Component-wise `a - b`, or `None` when any axis overflows.
#[must_use]
pub fn checked_sub(a: IVec3, b: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        a.x.checked_sub(b.x)?,
        a.y.checked_sub(b.y)?,
        a.z.checked_sub(b.z)?,
    ))
}

/// Returns `true` when `value` is finite and strictly positive.
#[must_use]
pub const fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
