//! Contact generation against implicit density surfaces.
//!
//! A [`FieldCollider`] turns two density samples and a surface direction into
//! a [`Contact`]: the outward normal and an estimate of how far the query point
//! sits inside solid. The estimate linearly interpolates the zero crossing
//! between the query point and a probe one sample step toward air, which is
//! exact for planar fields and close enough when the surface is near planar at
//! agent scale.
//!
//! Fields reach the collider through the [`FieldProbe`] seam so the same
//! contact logic runs against a live field ([`DirectField`]) or an exclusively
//! owned [`LocalFieldCache`].

use glam::DVec3;
use log::{trace, warn};

use crate::error::FieldError;
use crate::field::{DensityField, LocalFieldCache};
use crate::numeric::grid_cell;
use crate::{PENETRATION_EPSILON, PROBE_DISTANCE};

/// Overlap between an agent and solid ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing out of the solid.
    pub normal: DVec3,
    /// Distance to move along [`Self::normal`] to reach the surface.
    pub penetration: f64,
}

impl Contact {
    /// Displacement that resolves the overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::collision::Contact;
    /// use glam::DVec3;
    /// let contact = Contact { normal: DVec3::Y, penetration: 0.25 };
    /// assert_eq!(contact.correction(), DVec3::new(0.0, 0.25, 0.0));
    /// ```
    #[must_use]
    pub fn correction(&self) -> DVec3 {
        self.normal * self.penetration
    }
}

/// Produces contacts for a point or sphere at a position.
pub trait Collider {
    /// Returns the contact for an agent of `radius` centred at `position`,
    /// or `None` when the position is in air.
    ///
    /// # Errors
    /// Cached implementations fail when a sample escapes their window.
    fn contact(&mut self, position: DVec3, radius: f64) -> Result<Option<Contact>, FieldError>;
}

impl<C: Collider + ?Sized> Collider for Box<C> {
    fn contact(&mut self, position: DVec3, radius: f64) -> Result<Option<Contact>, FieldError> {
        (**self).contact(position, radius)
    }
}

/// Density access used by [`FieldCollider`].
pub trait FieldProbe {
    /// Readies the probe for queries around `position`.
    ///
    /// # Errors
    /// Implementations may fail when they cannot serve the region.
    fn prepare(&mut self, _position: DVec3) -> Result<(), FieldError> {
        Ok(())
    }

    /// Density at `position`.
    ///
    /// # Errors
    /// Fails when `position` is outside the probe's coverage.
    fn probe_density(&self, position: DVec3) -> Result<f64, FieldError>;

    /// Outward surface direction at `position`.
    ///
    /// # Errors
    /// Fails when the difference samples are outside the probe's coverage.
    fn probe_direction(&self, position: DVec3) -> Result<DVec3, FieldError>;
}

/// Uncached access to a field; every query evaluates it afresh.
#[derive(Debug, Clone)]
pub struct DirectField<F>(pub F);

impl<F: DensityField> FieldProbe for DirectField<F> {
    fn probe_density(&self, position: DVec3) -> Result<f64, FieldError> {
        Ok(self.0.density(position))
    }

    fn probe_direction(&self, position: DVec3) -> Result<DVec3, FieldError> {
        Ok(self.0.field_direction(position))
    }
}

impl<F: DensityField> FieldProbe for LocalFieldCache<F> {
    fn prepare(&mut self, position: DVec3) -> Result<(), FieldError> {
        self.ensure_covers(grid_cell(position)).map(|_| ())
    }

    fn probe_density(&self, position: DVec3) -> Result<f64, FieldError> {
        self.density(position)
    }

    fn probe_direction(&self, position: DVec3) -> Result<DVec3, FieldError> {
        self.field_direction(position)
    }
}

/// Point-sample collider over a density field.
#[derive(Debug, Clone)]
pub struct FieldCollider<P> {
    probe: P,
}

/// Collider evaluating its field on every query.
pub type DirectCollider<F> = FieldCollider<DirectField<F>>;
/// Collider answering from an owned sample window.
pub type CachedCollider<F> = FieldCollider<LocalFieldCache<F>>;

impl<P: FieldProbe> FieldCollider<P> {
    /// Builds a collider over an arbitrary probe.
    #[must_use]
    pub const fn new(probe: P) -> Self {
        Self { probe }
    }

    /// The underlying probe.
    #[must_use]
    pub const fn probe(&self) -> &P {
        &self.probe
    }
}

impl<F: DensityField> FieldCollider<DirectField<F>> {
    /// Collider that queries `field` directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::collision::{Collider, FieldCollider};
    /// use fieldwalk::field::HalfSpace;
    /// use glam::DVec3;
    /// let mut collider = FieldCollider::direct(HalfSpace::below(0.0));
    /// let contact = collider
    ///     .contact(DVec3::new(0.0, -0.25, 0.0), 0.2)
    ///     .expect("direct queries never fail")
    ///     .expect("point is inside the ground");
    /// assert!((contact.penetration - 0.25).abs() < 1e-9);
    /// ```
    #[must_use]
    pub const fn direct(field: F) -> Self {
        Self::new(DirectField(field))
    }
}

impl<F: DensityField> FieldCollider<LocalFieldCache<F>> {
    /// Collider that answers from an owned cache of half extent
    /// `half_extent`.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidWindow`] for unsupported window sizes.
    pub fn cached(field: F, half_extent: u32) -> Result<Self, FieldError> {
        LocalFieldCache::new(field, half_extent).map(Self::new)
    }
}

impl<P: FieldProbe> Collider for FieldCollider<P> {
    fn contact(&mut self, position: DVec3, radius: f64) -> Result<Option<Contact>, FieldError> {
        debug_assert!(radius > 0.0, "agent radius must be positive, got {radius}");
        self.probe.prepare(position)?;
        let centre = self.probe.probe_density(position)?;
        if centre.is_nan() || centre <= 0.0 {
            return Ok(None);
        }
        let normal = self.probe.probe_direction(position)?;
        let tip = self
            .probe
            .probe_density(position + normal * PROBE_DISTANCE)?;
        let penetration = estimate_penetration(centre, tip, PROBE_DISTANCE);
        trace!("contact at {position}: normal {normal}, penetration {penetration}");
        Ok(Some(Contact {
            normal,
            penetration,
        }))
    }
}

/// Estimates the distance from a solid sample to the surface.
///
/// `centre` is the density at the query point and `tip` the density one
/// `probe` step toward air. The zero crossing is interpolated linearly and its
/// distance from the centre returned. When the tip is not in air, or the
/// interpolation is non-finite or vanishingly small, the result is
/// [`PENETRATION_EPSILON`].
///
/// # Examples
///
/// ```
/// use fieldwalk::collision::estimate_penetration;
/// use fieldwalk::PENETRATION_EPSILON;
/// assert!((estimate_penetration(0.3, -0.7, 1.0) - 0.3).abs() < 1e-12);
/// assert_eq!(estimate_penetration(1.5, 0.5, 1.0), PENETRATION_EPSILON);
/// ```
#[must_use]
pub fn estimate_penetration(centre: f64, tip: f64, probe: f64) -> f64 {
    if tip.is_nan() || tip >= 0.0 {
        warn!("penetration probe found no surface (centre {centre}, tip {tip})");
        return PENETRATION_EPSILON;
    }
    let part = centre.abs() / (centre - tip).abs();
    let depth = part * probe;
    if depth.is_finite() && depth > PENETRATION_EPSILON {
        depth
    } else {
        PENETRATION_EPSILON
    }
}
