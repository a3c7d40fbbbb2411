//! Bounded sample window amortising density evaluation around an agent.
//!
//! The cache snapshots a cube of lattice samples around a point of interest
//! and answers interpolated density and direction queries from it. It is an
//! amortisation strategy only: lattice-point answers are identical to the
//! wrapped field's. A cache belongs to exactly one consumer and is refilled
//! in place whenever the consumer walks out of the covered region.

use glam::{DVec3, IVec3};
use log::debug;

use super::{direction_from_gradient, DensityField};
use crate::error::FieldError;
use crate::numeric::{checked_add, checked_sub, grid_cell};
use crate::{CACHE_MARGIN, FIELD_SAMPLE_STEP, MAX_CACHE_HALF_EXTENT, MIN_CACHE_HALF_EXTENT};

/// Window of `(2r + 1)³` density samples plus one guard layer per face.
#[derive(Debug, Clone)]
pub struct LocalFieldCache<F> {
    field: F,
    half_extent: u32,
    edge: i32,
    base: IVec3,
    samples: Vec<f64>,
    filled: bool,
    refills: u64,
}

impl<F: DensityField> LocalFieldCache<F> {
    /// Allocates an empty window of half extent `half_extent` over `field`.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidWindow`] when `half_extent` lies outside
    /// [`MIN_CACHE_HALF_EXTENT`]`..=`[`MAX_CACHE_HALF_EXTENT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::field::{HalfSpace, LocalFieldCache};
    /// let cache = LocalFieldCache::new(HalfSpace::below(0.0), 4).expect("valid window");
    /// assert_eq!(cache.edge(), 11);
    /// assert!(LocalFieldCache::new(HalfSpace::below(0.0), 1).is_err());
    /// ```
    pub fn new(field: F, half_extent: u32) -> Result<Self, FieldError> {
        let invalid = FieldError::InvalidWindow {
            half_extent,
            minimum: MIN_CACHE_HALF_EXTENT,
            maximum: MAX_CACHE_HALF_EXTENT,
        };
        if !(MIN_CACHE_HALF_EXTENT..=MAX_CACHE_HALF_EXTENT).contains(&half_extent) {
            return Err(invalid);
        }
        let edge = i32::try_from(half_extent)
            .ok()
            .and_then(|r| r.checked_mul(2))
            .and_then(|span| span.checked_add(3))
            .ok_or(invalid)?;
        let side = usize::try_from(edge).map_err(|_| invalid)?;
        Ok(Self {
            field,
            half_extent,
            edge,
            base: IVec3::ZERO,
            samples: vec![0.0; side * side * side],
            filled: false,
            refills: 0,
        })
    }

    /// Makes sure `origin` sits inside the window with room for gradient
    /// and probe queries, refilling around it otherwise.
    ///
    /// Returns `true` when a refill happened.
    ///
    /// # Errors
    /// Returns [`FieldError::OutsideLattice`] when a window centred on
    /// `origin` would not fit in the `i32` lattice. The window is left
    /// untouched in that case.
    pub fn ensure_covers(&mut self, origin: IVec3) -> Result<bool, FieldError> {
        if self.covers(origin) {
            return Ok(false);
        }
        let outside = FieldError::OutsideLattice {
            origin,
            edge: self.edge,
        };
        let base = checked_sub(origin, IVec3::splat(self.edge / 2)).ok_or(outside)?;
        checked_add(base, IVec3::splat(self.edge - 1)).ok_or(outside)?;
        self.base = base;
        self.refill();
        debug!(
            "field cache recentred on {origin} (base {}, refill {})",
            self.base, self.refills
        );
        Ok(true)
    }

    /// Returns `true` when `origin` is covered with the full query margin.
    #[must_use]
    pub fn covers(&self, origin: IVec3) -> bool {
        if !self.filled {
            return false;
        }
        let Some(local) = checked_sub(origin, self.base) else {
            return false;
        };
        let low = IVec3::splat(CACHE_MARGIN);
        let high = IVec3::splat(self.edge - 1 - CACHE_MARGIN);
        local.cmpge(low).all() && local.cmple(high).all()
    }

    /// Reads the sample at window-relative coordinate `local`.
    ///
    /// # Errors
    /// [`FieldError::EmptyWindow`] before the first fill and
    /// [`FieldError::OutOfRange`] for coordinates outside the window.
    pub fn sample(&self, local: IVec3) -> Result<f64, FieldError> {
        if !self.filled {
            return Err(FieldError::EmptyWindow);
        }
        self.index(local)
            .and_then(|index| self.samples.get(index).copied())
            .ok_or(FieldError::OutOfRange {
                local,
                edge: self.edge,
            })
    }

    /// Trilinearly interpolated density at world position `position`.
    ///
    /// # Errors
    /// Fails when the interpolation cell is not inside the window.
    pub fn density(&self, position: DVec3) -> Result<f64, FieldError> {
        if !self.filled {
            return Err(FieldError::EmptyWindow);
        }
        let cell = grid_cell(position);
        let local = checked_sub(cell, self.base)
            .filter(|local| {
                local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(self.edge - 1)).all()
            })
            .ok_or(FieldError::OutOfRange {
                local: cell.saturating_sub(self.base),
                edge: self.edge,
            })?;
        let t = position - cell.as_dvec3();
        let corner = |dx: i32, dy: i32, dz: i32| self.sample(local + IVec3::new(dx, dy, dz));

        let x00 = lerp(corner(0, 0, 0)?, corner(1, 0, 0)?, t.x);
        let x10 = lerp(corner(0, 1, 0)?, corner(1, 1, 0)?, t.x);
        let x01 = lerp(corner(0, 0, 1)?, corner(1, 0, 1)?, t.x);
        let x11 = lerp(corner(0, 1, 1)?, corner(1, 1, 1)?, t.x);
        let y0 = lerp(x00, x10, t.y);
        let y1 = lerp(x01, x11, t.y);
        Ok(lerp(y0, y1, t.z))
    }

    /// Outward surface direction at `position`, estimated from cached
    /// samples with central differences.
    ///
    /// # Errors
    /// Fails when any difference sample falls outside the window.
    pub fn field_direction(&self, position: DVec3) -> Result<DVec3, FieldError> {
        let mut gradient = DVec3::ZERO;
        for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
            let ahead = self.density(position + axis * FIELD_SAMPLE_STEP)?;
            let behind = self.density(position - axis * FIELD_SAMPLE_STEP)?;
            gradient += axis * (ahead - behind);
        }
        Ok(direction_from_gradient(gradient / (2.0 * FIELD_SAMPLE_STEP)))
    }

    fn refill(&mut self) {
        let base = self.base;
        let field = &self.field;
        for (slot, local) in self.samples.iter_mut().zip(lattice(self.edge)) {
            *slot = field.density((base + local).as_dvec3());
        }
        self.filled = true;
        self.refills += 1;
    }
}

impl<F> LocalFieldCache<F> {
    fn index(&self, local: IVec3) -> Option<usize> {
        let inside = local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(self.edge)).all();
        if !inside {
            return None;
        }
        usize::try_from(local.x + self.edge * (local.y + self.edge * local.z)).ok()
    }

    /// World lattice coordinate of window sample `(0, 0, 0)`.
    #[must_use]
    pub const fn base(&self) -> IVec3 {
        self.base
    }

    /// Samples per window axis, guard layers included.
    #[must_use]
    pub const fn edge(&self) -> i32 {
        self.edge
    }

    /// Configured half extent `r`.
    #[must_use]
    pub const fn half_extent(&self) -> u32 {
        self.half_extent
    }

    /// Number of times the window has been (re)filled.
    #[must_use]
    pub const fn refill_count(&self) -> u64 {
        self.refills
    }

    /// Returns `true` once the window holds samples.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.filled
    }

    /// The wrapped field.
    #[must_use]
    pub const fn field(&self) -> &F {
        &self.field
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// Window-relative coordinates in storage order, x fastest.
fn lattice(edge: i32) -> impl Iterator<Item = IVec3> {
    (0..edge).flat_map(move |z| {
        (0..edge).flat_map(move |y| (0..edge).map(move |x| IVec3::new(x, y, z)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Ball, FnField, HalfSpace};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ground_cache() -> LocalFieldCache<HalfSpace> {
        let mut cache =
            LocalFieldCache::new(HalfSpace::below(0.0), 4).expect("window should be valid");
        cache.ensure_covers(IVec3::ZERO).expect("origin is addressable");
        cache
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(65)]
    fn rejects_invalid_half_extent(#[case] half_extent: u32) {
        let err = LocalFieldCache::new(HalfSpace::below(0.0), half_extent)
            .expect_err("half extent should be rejected");
        assert!(matches!(err, FieldError::InvalidWindow { .. }));
    }

    #[test]
    fn empty_window_rejects_queries() {
        let cache = LocalFieldCache::new(HalfSpace::below(0.0), 3).expect("valid window");
        assert_eq!(cache.sample(IVec3::ZERO), Err(FieldError::EmptyWindow));
        assert!(!cache.covers(IVec3::ZERO));
    }

    #[rstest]
    fn window_is_centred_on_origin(ground_cache: LocalFieldCache<HalfSpace>) {
        assert_eq!(ground_cache.edge(), 11);
        assert_eq!(ground_cache.base(), IVec3::splat(-5));
        assert_eq!(ground_cache.refill_count(), 1);
    }

    #[rstest]
    fn nearby_origins_do_not_refill(mut ground_cache: LocalFieldCache<HalfSpace>) {
        assert_eq!(ground_cache.ensure_covers(IVec3::new(2, -2, 2)), Ok(false));
        assert_eq!(ground_cache.refill_count(), 1);
    }

    #[rstest]
    fn distant_origin_refills_in_place(mut ground_cache: LocalFieldCache<HalfSpace>) {
        let before = ground_cache.samples.len();
        assert_eq!(ground_cache.ensure_covers(IVec3::new(3, 0, 0)), Ok(true));
        assert_eq!(ground_cache.refill_count(), 2);
        assert_eq!(ground_cache.base(), IVec3::new(-2, -5, -5));
        assert_eq!(ground_cache.samples.len(), before);
    }

    #[rstest]
    #[case(IVec3::new(-1, 0, 0))]
    #[case(IVec3::new(0, 11, 0))]
    #[case(IVec3::new(3, 3, 42))]
    fn out_of_window_samples_fail(
        ground_cache: LocalFieldCache<HalfSpace>,
        #[case] local: IVec3,
    ) {
        assert_eq!(
            ground_cache.sample(local),
            Err(FieldError::OutOfRange { local, edge: 11 })
        );
    }

    #[rstest]
    fn far_world_queries_fail(ground_cache: LocalFieldCache<HalfSpace>) {
        let err = ground_cache
            .density(DVec3::new(40.0, 0.0, 0.0))
            .expect_err("query should be outside the window");
        assert!(matches!(err, FieldError::OutOfRange { .. }));
    }

    #[rstest]
    #[case(IVec3::new(i32::MAX, 0, 0))]
    #[case(IVec3::new(0, i32::MIN + 2, 0))]
    #[case(IVec3::new(3, -1, i32::MAX - 4))]
    fn windows_past_the_lattice_edge_are_refused(
        mut ground_cache: LocalFieldCache<HalfSpace>,
        #[case] origin: IVec3,
    ) {
        assert_eq!(
            ground_cache.ensure_covers(origin),
            Err(FieldError::OutsideLattice { origin, edge: 11 })
        );
        assert_eq!(ground_cache.base(), IVec3::splat(-5));
        assert_eq!(ground_cache.refill_count(), 1);
    }

    #[rstest]
    fn saturated_cells_are_out_of_range(ground_cache: LocalFieldCache<HalfSpace>) {
        let err = ground_cache
            .density(DVec3::new(3.0e9, 0.0, -3.0e9))
            .expect_err("position lies beyond the lattice");
        assert!(matches!(err, FieldError::OutOfRange { .. }));
        assert!(ground_cache.field_direction(DVec3::new(3.0e9, 0.0, 0.0)).is_err());
    }

    #[test]
    fn windows_near_the_lattice_edge_still_fill() {
        let mut cache = LocalFieldCache::new(HalfSpace::below(0.0), 3).expect("valid window");
        let origin = IVec3::new(i32::MAX - 5, 0, i32::MIN + 4);
        assert_eq!(cache.ensure_covers(origin), Ok(true));
        assert_eq!(cache.base(), IVec3::new(i32::MAX - 9, -4, i32::MIN));
        let point = DVec3::new(f64::from(i32::MAX - 5), -0.5, f64::from(i32::MIN + 4));
        assert_relative_eq!(cache.density(point).expect("inside window"), 0.5);
    }

    #[test]
    fn lattice_samples_match_direct_field() {
        let ball = Ball::new(DVec3::new(0.5, 0.0, -0.5), 3.0);
        let mut cache = LocalFieldCache::new(ball, 4).expect("valid window");
        cache.ensure_covers(IVec3::ZERO).expect("origin is addressable");
        for x in -2..=2 {
            for y in -2..=2 {
                let point = DVec3::new(f64::from(x), f64::from(y), 1.0);
                let cached = cache.density(point).expect("inside window");
                assert_eq!(cached.to_bits(), ball.density(point).to_bits());
            }
        }
    }

    #[rstest]
    #[case(DVec3::new(0.25, -0.75, 0.5))]
    #[case(DVec3::new(-1.5, 1.125, 2.0))]
    fn interpolation_is_exact_for_planes(
        ground_cache: LocalFieldCache<HalfSpace>,
        #[case] position: DVec3,
    ) {
        let cached = ground_cache.density(position).expect("inside window");
        assert_relative_eq!(cached, -position.y, epsilon = 1e-12);
    }

    #[rstest]
    fn cached_direction_is_unit_length(ground_cache: LocalFieldCache<HalfSpace>) {
        let direction = ground_cache
            .field_direction(DVec3::new(0.3, -0.2, 0.9))
            .expect("inside window");
        assert_relative_eq!(direction.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(direction.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_cached_region_uses_default_direction() {
        let mut cache = LocalFieldCache::new(FnField::new(|_| 0.5), 3).expect("valid window");
        cache.ensure_covers(IVec3::ZERO).expect("origin is addressable");
        let direction = cache.field_direction(DVec3::ZERO).expect("inside window");
        assert_eq!(direction, crate::field::DEFAULT_FIELD_DIRECTION);
    }
}
