//! Scalar density fields and their derived surface directions.
//!
//! A [`DensityField`] maps world positions to a scalar: negative values are
//! air, positive values are solid, and the implicit surface is the zero
//! crossing. Fields must be referentially transparent for a given world
//! configuration. Whether they are safe to share across threads is up to each
//! implementation; the ones in this module hold no mutable state.

mod cache;
mod shapes;
mod terrain;

use std::sync::Arc;

use glam::DVec3;

use crate::vector_math::normalize_or;
use crate::{FIELD_SAMPLE_STEP, GRADIENT_EPSILON};

pub use cache::LocalFieldCache;
pub use shapes::{Ball, FnField, HalfSpace, Resampled, Translated};
pub use terrain::NoiseTerrain;

/// Direction returned when the local gradient is numerically zero.
pub const DEFAULT_FIELD_DIRECTION: DVec3 = DVec3::Y;

/// Scalar field query contract consumed by caches and colliders.
pub trait DensityField {
    /// Returns the density at `position`.
    fn density(&self, position: DVec3) -> f64;

    /// Spacing used for central-difference gradient estimates.
    fn sample_step(&self) -> f64 {
        FIELD_SAMPLE_STEP
    }

    /// Returns the unit direction pointing from solid toward air at
    /// `position`.
    ///
    /// The estimate uses central differences at [`Self::sample_step`]. Flat
    /// or non-finite regions yield [`DEFAULT_FIELD_DIRECTION`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::field::{DensityField, HalfSpace};
    /// use glam::DVec3;
    /// let ground = HalfSpace::below(0.0);
    /// let up = ground.field_direction(DVec3::new(4.0, -0.5, 2.0));
    /// assert!((up - DVec3::Y).length() < 1e-9);
    /// ```
    fn field_direction(&self, position: DVec3) -> DVec3 {
        let gradient = central_gradient(|p| self.density(p), position, self.sample_step());
        direction_from_gradient(gradient)
    }
}

/// Estimates the density gradient at `position` with central differences.
#[must_use]
pub fn central_gradient<F>(mut density: F, position: DVec3, step: f64) -> DVec3
where
    F: FnMut(DVec3) -> f64,
{
    let mut axis_delta = |axis: DVec3| {
        density(position + axis * step) - density(position - axis * step)
    };
    let raw = DVec3::new(
        axis_delta(DVec3::X),
        axis_delta(DVec3::Y),
        axis_delta(DVec3::Z),
    );
    raw / (2.0 * step)
}

/// Converts a density gradient into the outward surface direction.
///
/// Degenerate gradients fall back to [`DEFAULT_FIELD_DIRECTION`].
///
/// # Examples
///
/// ```
/// use fieldwalk::field::{direction_from_gradient, DEFAULT_FIELD_DIRECTION};
/// use glam::DVec3;
/// assert_eq!(direction_from_gradient(DVec3::new(0.0, 0.0, -2.0)), DVec3::Z);
/// assert_eq!(direction_from_gradient(DVec3::ZERO), DEFAULT_FIELD_DIRECTION);
/// ```
#[must_use]
pub fn direction_from_gradient(gradient: DVec3) -> DVec3 {
    normalize_or(-gradient, GRADIENT_EPSILON, DEFAULT_FIELD_DIRECTION)
}

impl<F: DensityField + ?Sized> DensityField for &F {
    fn density(&self, position: DVec3) -> f64 {
        (**self).density(position)
    }

    fn sample_step(&self) -> f64 {
        (**self).sample_step()
    }

    fn field_direction(&self, position: DVec3) -> DVec3 {
        (**self).field_direction(position)
    }
}

impl<F: DensityField + ?Sized> DensityField for Box<F> {
    fn density(&self, position: DVec3) -> f64 {
        (**self).density(position)
    }

    fn sample_step(&self) -> f64 {
        (**self).sample_step()
    }

    fn field_direction(&self, position: DVec3) -> DVec3 {
        (**self).field_direction(position)
    }
}

impl<F: DensityField + ?Sized> DensityField for Arc<F> {
    fn density(&self, position: DVec3) -> f64 {
        (**self).density(position)
    }

    fn sample_step(&self) -> f64 {
        (**self).sample_step()
    }

    fn field_direction(&self, position: DVec3) -> DVec3 {
        (**self).field_direction(position)
    }
}
