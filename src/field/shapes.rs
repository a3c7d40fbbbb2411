//! Analytic fields and frame adapters.

use std::fmt;

use glam::DVec3;

use super::DensityField;
use crate::vector_math::normalize_or;
use crate::GRADIENT_EPSILON;

/// Solid half space below a plane.
///
/// Density grows linearly with depth beneath the plane, so the field is a
/// signed distance and every collision estimate against it is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    up: DVec3,
    height: f64,
}

impl HalfSpace {
    /// Creates a half space whose surface passes `height` units along `up`
    /// from the origin. Air lies on the `up` side.
    ///
    /// A degenerate `up` falls back to `+Y`.
    #[must_use]
    pub fn new(up: DVec3, height: f64) -> Self {
        Self {
            up: normalize_or(up, GRADIENT_EPSILON, DVec3::Y),
            height,
        }
    }

    /// Level ground: solid wherever `y < height`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::field::{DensityField, HalfSpace};
    /// use glam::DVec3;
    /// let ground = HalfSpace::below(1.0);
    /// assert!(ground.density(DVec3::new(0.0, 0.5, 0.0)) > 0.0);
    /// assert!(ground.density(DVec3::new(0.0, 1.5, 0.0)) < 0.0);
    /// ```
    #[must_use]
    pub const fn below(height: f64) -> Self {
        Self {
            up: DVec3::Y,
            height,
        }
    }

    /// Unit normal of the surface, pointing into air.
    #[must_use]
    pub const fn up(&self) -> DVec3 {
        self.up
    }
}

impl DensityField for HalfSpace {
    fn density(&self, position: DVec3) -> f64 {
        self.height - self.up.dot(position)
    }
}

/// Solid sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    centre: DVec3,
    radius: f64,
}

impl Ball {
    /// Creates a solid ball of `radius` around `centre`.
    #[must_use]
    pub const fn new(centre: DVec3, radius: f64) -> Self {
        Self { centre, radius }
    }
}

impl DensityField for Ball {
    fn density(&self, position: DVec3) -> f64 {
        self.radius - position.distance(self.centre)
    }
}

/// Adapts a closure into a [`DensityField`].
///
/// # Examples
///
/// ```
/// use fieldwalk::field::{DensityField, FnField};
/// use glam::DVec3;
/// let ridge = FnField::new(|p: DVec3| 2.0 - p.y - p.x.abs());
/// assert_eq!(ridge.density(DVec3::new(1.0, 0.0, 0.0)), 1.0);
/// ```
#[derive(Clone, Copy)]
pub struct FnField<F> {
    density: F,
}

impl<F> FnField<F>
where
    F: Fn(DVec3) -> f64,
{
    /// Wraps `density` as a field.
    #[must_use]
    pub const fn new(density: F) -> Self {
        Self { density }
    }
}

impl<F> fmt::Debug for FnField<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnField").finish_non_exhaustive()
    }
}

impl<F> DensityField for FnField<F>
where
    F: Fn(DVec3) -> f64,
{
    fn density(&self, position: DVec3) -> f64 {
        (self.density)(position)
    }
}

/// Samples an inner field in a frame shifted by `offset`.
///
/// Querying `position` reads the inner field at `position + offset`, which
/// maps origin-relative coordinates back into world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translated<F> {
    inner: F,
    offset: DVec3,
}

impl<F> Translated<F> {
    /// Wraps `inner` so local queries land at `local + offset` in its frame.
    #[must_use]
    pub const fn new(inner: F, offset: DVec3) -> Self {
        Self { inner, offset }
    }

    /// Moves the frame, typically after a floating-origin shift.
    pub const fn set_offset(&mut self, offset: DVec3) {
        self.offset = offset;
    }

    /// Current frame offset.
    #[must_use]
    pub const fn offset(&self) -> DVec3 {
        self.offset
    }
}

impl<F: DensityField> DensityField for Translated<F> {
    fn density(&self, position: DVec3) -> f64 {
        self.inner.density(position + self.offset)
    }

    fn sample_step(&self) -> f64 {
        self.inner.sample_step()
    }
}

/// Samples an inner field with per-axis coordinate scaling.
///
/// Stretching the horizontal axes lets a coarse field cover more ground at
/// the cost of detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resampled<F> {
    inner: F,
    scale: DVec3,
}

impl<F> Resampled<F> {
    /// Wraps `inner` so `position` reads the inner field at
    /// `position * scale`.
    #[must_use]
    pub const fn new(inner: F, scale: DVec3) -> Self {
        Self { inner, scale }
    }
}

impl<F: DensityField> DensityField for Resampled<F> {
    fn density(&self, position: DVec3) -> f64 {
        self.inner.density(position * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(DVec3::new(0.0, -2.0, 0.0), 2.0)]
    #[case(DVec3::new(10.0, 3.0, -4.0), -3.0)]
    #[case(DVec3::new(0.0, 0.0, 0.0), 0.0)]
    fn level_ground_density_is_depth(#[case] position: DVec3, #[case] expected: f64) {
        assert_relative_eq!(HalfSpace::below(0.0).density(position), expected);
    }

    #[test]
    fn tilted_half_space_normalises_up() {
        let slope = HalfSpace::new(DVec3::new(1.0, 1.0, 0.0), 0.0);
        assert_relative_eq!(slope.up().length(), 1.0, epsilon = 1e-12);
        let direction = slope.field_direction(DVec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(direction.dot(slope.up()), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_half_space_defaults_to_level() {
        assert_eq!(HalfSpace::new(DVec3::ZERO, 1.0).up(), DVec3::Y);
    }

    #[test]
    fn ball_is_solid_inside() {
        let ball = Ball::new(DVec3::new(0.0, 10.0, 0.0), 2.0);
        assert!(ball.density(DVec3::new(0.0, 10.5, 0.0)) > 0.0);
        assert!(ball.density(DVec3::new(0.0, 13.0, 0.0)) < 0.0);
    }

    #[test]
    fn translated_maps_local_to_world() {
        let mut shifted = Translated::new(HalfSpace::below(0.0), DVec3::new(100.0, -5.0, 0.0));
        assert_relative_eq!(shifted.density(DVec3::ZERO), 5.0);
        shifted.set_offset(DVec3::ZERO);
        assert_relative_eq!(shifted.density(DVec3::ZERO), 0.0);
    }

    #[test]
    fn resampled_scales_coordinates() {
        let stretched = Resampled::new(FnField::new(|p: DVec3| p.x), DVec3::new(0.5, 1.0, 0.5));
        assert_relative_eq!(stretched.density(DVec3::new(4.0, 0.0, 0.0)), 2.0);
    }
}
