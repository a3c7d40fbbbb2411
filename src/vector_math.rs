//! Horizontal projections and fallback normalisation for world-space vectors.
use glam::{DVec2, DVec3};

/// Projects a world vector onto the horizontal plane as `(x, z)`.
///
/// # Examples
/// ```
/// use fieldwalk::vector_math::horizontal;
/// use glam::{DVec2, DVec3};
/// assert_eq!(horizontal(DVec3::new(1.0, 5.0, -2.0)), DVec2::new(1.0, -2.0));
/// ```
#[must_use]
pub const fn horizontal(vector: DVec3) -> DVec2 {
    DVec2::new(vector.x, vector.z)
}

/// Replaces the horizontal components of `vector`, keeping its elevation.
#[must_use]
pub const fn with_horizontal(vector: DVec3, planar: DVec2) -> DVec3 {
    DVec3::new(planar.x, vector.y, planar.y)
}

/// Returns the unit vector along `vector`, or `fallback` when the input is
/// non-finite or shorter than `min_length`.
///
/// # Examples
///
/// ```
/// use fieldwalk::vector_math::normalize_or;
/// use glam::DVec3;
/// let unit = normalize_or(DVec3::new(3.0, 0.0, 4.0), 1e-9, DVec3::Y);
/// assert!((unit.x - 0.6).abs() < 1e-12);
/// assert!((unit.z - 0.8).abs() < 1e-12);
///
/// assert_eq!(normalize_or(DVec3::ZERO, 1e-9, DVec3::Y), DVec3::Y);
/// ```
#[must_use]
pub fn normalize_or(vector: DVec3, min_length: f64, fallback: DVec3) -> DVec3 {
    if !vector.is_finite() || vector.length_squared() <= min_length * min_length {
        return fallback;
    }
    vector.try_normalize().unwrap_or(fallback)
}
