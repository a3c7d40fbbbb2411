//! Floating-origin target keeping the observer near `(0, y, 0)`.
//!
//! Large world coordinates lose precision once converted to the renderer's
//! single-precision transforms. This target therefore tracks the true world
//! location itself, pins the observer above the origin and asks a paging
//! collaborator to move world content by the horizontal difference instead.
//! Anything needing the real position must read [`FloatingOriginTarget::location`]
//! or its [`VersionedReader`]; the observer's translation is origin-relative.

use glam::{DQuat, DVec2, DVec3};
use log::{debug, trace, warn};

use super::{MovementTarget, Observer, VersionedCell, VersionedReader};
use crate::vector_math::{horizontal, with_horizontal};

/// Collaborator that shifts or streams world content.
#[cfg_attr(test, mockall::automock)]
pub trait WorldRecenter {
    /// Moves world content so the observer appears displaced by
    /// `(dx, 0, dz)` in world space.
    fn recenter(&mut self, dx: f64, dz: f64);
}

impl<P: WorldRecenter + ?Sized> WorldRecenter for Box<P> {
    fn recenter(&mut self, dx: f64, dz: f64) {
        (**self).recenter(dx, dz);
    }
}

/// Movement target that moves the world rather than the observer.
#[derive(Debug)]
pub struct FloatingOriginTarget<O, P> {
    observer: O,
    pager: P,
    location: DVec3,
    world: VersionedCell<DVec3>,
}

impl<O: Observer, P: WorldRecenter> FloatingOriginTarget<O, P> {
    /// Wraps `observer`, adopting its current translation as the starting
    /// world location.
    ///
    /// An observer that starts away from the origin triggers an immediate
    /// recentre so its horizontal translation returns to zero.
    #[must_use]
    pub fn new(observer: O, pager: P) -> Self {
        let start = observer.translation();
        let mut target = Self {
            observer,
            pager,
            location: DVec3::ZERO,
            world: VersionedCell::new(DVec3::ZERO),
        };
        target.set_location(start);
        target
    }

    /// Reader for the tracked world location.
    #[must_use]
    pub fn world_position(&self) -> VersionedReader<DVec3> {
        self.world.reader()
    }

    /// Horizontal offset between observer space and world space.
    #[must_use]
    pub const fn world_offset(&self) -> DVec3 {
        with_horizontal(DVec3::ZERO, horizontal(self.location))
    }

    /// Converts an observer-relative position into world space.
    #[must_use]
    pub fn local_to_world(&self, local: DVec3) -> DVec3 {
        local + self.world_offset()
    }

    /// Converts a world position into observer-relative space.
    #[must_use]
    pub fn world_to_local(&self, world: DVec3) -> DVec3 {
        world - self.world_offset()
    }

    /// The paging collaborator.
    #[must_use]
    pub const fn pager(&self) -> &P {
        &self.pager
    }

    /// The driven observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O: Observer, P: WorldRecenter> MovementTarget for FloatingOriginTarget<O, P> {
    fn set_location(&mut self, location: DVec3) {
        if location == self.location {
            trace!("floating origin already at {location}");
            return;
        }
        if !location.is_finite() {
            warn!("ignoring non-finite floating origin location {location}");
            return;
        }
        let shift = horizontal(location - self.location);
        self.location = location;
        if shift != DVec2::ZERO {
            debug!("recentring world by ({}, {})", shift.x, shift.y);
            self.pager.recenter(shift.x, shift.y);
        }
        self.observer.set_translation(DVec3::new(0.0, location.y, 0.0));
        self.world.set(location);
    }

    fn location(&self) -> DVec3 {
        self.location
    }

    fn set_facing(&mut self, facing: DQuat) {
        self.observer.set_rotation(facing);
    }

    fn facing(&self) -> DQuat {
        self.observer.rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::ObserverTransform;
    use mockall::predicate::eq;

    fn target_with(
        pager: MockWorldRecenter,
    ) -> FloatingOriginTarget<ObserverTransform, MockWorldRecenter> {
        FloatingOriginTarget::new(ObserverTransform::default(), pager)
    }

    #[test]
    fn repeated_location_recentres_once() {
        let mut pager = MockWorldRecenter::new();
        pager
            .expect_recenter()
            .with(eq(3.0), eq(-4.0))
            .times(1)
            .return_const(());
        let mut target = target_with(pager);
        target.set_location(DVec3::new(3.0, 1.0, -4.0));
        target.set_location(DVec3::new(3.0, 1.0, -4.0));
        assert_eq!(target.location(), DVec3::new(3.0, 1.0, -4.0));
    }

    #[test]
    fn elevation_changes_skip_paging() {
        let mut pager = MockWorldRecenter::new();
        pager.expect_recenter().never();
        let mut target = target_with(pager);
        target.set_location(DVec3::new(0.0, 12.0, 0.0));
        assert_eq!(target.observer().translation, DVec3::new(0.0, 12.0, 0.0));
    }

    #[test]
    fn observer_stays_over_origin() {
        let mut pager = MockWorldRecenter::new();
        pager.expect_recenter().times(3).return_const(());
        let mut target = target_with(pager);
        for step in 1..=3 {
            let offset = f64::from(step) * 100.0;
            target.set_location(DVec3::new(offset, 2.0, -offset));
            assert_eq!(target.observer().translation, DVec3::new(0.0, 2.0, 0.0));
        }
        assert_eq!(target.world_offset(), DVec3::new(300.0, 0.0, -300.0));
        let local = target.observer().translation;
        assert_eq!(target.local_to_world(local), target.location());
        assert_eq!(target.world_to_local(target.location()), local);
    }

    #[test]
    fn off_origin_observer_is_recentred_on_construction() {
        let mut pager = MockWorldRecenter::new();
        pager
            .expect_recenter()
            .with(eq(5.0), eq(6.0))
            .times(1)
            .return_const(());
        let observer = ObserverTransform::from_translation(DVec3::new(5.0, 1.0, 6.0));
        let target = FloatingOriginTarget::new(observer, pager);
        assert_eq!(target.location(), DVec3::new(5.0, 1.0, 6.0));
        assert_eq!(target.observer().translation, DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn world_position_reports_versions() {
        let mut pager = MockWorldRecenter::new();
        pager.expect_recenter().return_const(());
        let mut target = target_with(pager);
        let mut reader = target.world_position();
        assert!(!reader.has_changed());
        target.set_location(DVec3::new(1.0, 0.0, 0.0));
        target.set_location(DVec3::new(1.0, 0.0, 0.0));
        assert!(reader.has_changed());
        assert_eq!(reader.update(), DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(reader.seen_version(), 1);
    }

    #[test]
    fn non_finite_locations_are_ignored() {
        let mut pager = MockWorldRecenter::new();
        pager.expect_recenter().never();
        let mut target = target_with(pager);
        target.set_location(DVec3::new(f64::NAN, 0.0, 0.0));
        assert_eq!(target.location(), DVec3::ZERO);
    }
}
