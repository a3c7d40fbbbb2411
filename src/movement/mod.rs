//! Movement targets: the sinks navigation code drives each tick.
//!
//! A [`MovementTarget`] accepts absolute locations and facings. Wrapping
//! targets own the target they decorate, so behaviour is chosen by
//! composition:
//!
//! - [`DirectTarget`] writes straight to an [`Observer`];
//! - [`FloatingOriginTarget`] keeps the observer near the origin and shifts
//!   the world through a [`WorldRecenter`] collaborator instead;
//! - [`WalkingTarget`] turns requested locations into impulses, integrates
//!   gravity and braking, and resolves contacts before forwarding.

mod direct;
mod floating_origin;
mod versioned;
mod walking;

use std::sync::{Arc, PoisonError, RwLock};

use glam::{DQuat, DVec3};

use crate::error::MovementError;

pub use direct::DirectTarget;
pub use floating_origin::{FloatingOriginTarget, WorldRecenter};
pub use versioned::{VersionedCell, VersionedReader};
pub use walking::{AgentState, WalkingTarget};

/// Interface through which navigation moves the viewpoint.
pub trait MovementTarget {
    /// Requests that the viewpoint move to `location`.
    fn set_location(&mut self, location: DVec3);

    /// Current world location of the viewpoint.
    fn location(&self) -> DVec3;

    /// Sets the viewpoint orientation.
    fn set_facing(&mut self, facing: DQuat);

    /// Current viewpoint orientation.
    fn facing(&self) -> DQuat;

    /// Advances time-dependent behaviour by `dt` seconds.
    ///
    /// # Errors
    /// Returns [`MovementError`] when the tick cannot be simulated.
    fn update(&mut self, _dt: f64) -> Result<(), MovementError> {
        Ok(())
    }
}

impl<T: MovementTarget + ?Sized> MovementTarget for Box<T> {
    fn set_location(&mut self, location: DVec3) {
        (**self).set_location(location);
    }

    fn location(&self) -> DVec3 {
        (**self).location()
    }

    fn set_facing(&mut self, facing: DQuat) {
        (**self).set_facing(facing);
    }

    fn facing(&self) -> DQuat {
        (**self).facing()
    }

    fn update(&mut self, dt: f64) -> Result<(), MovementError> {
        (**self).update(dt)
    }
}

/// Transform of the rendering viewpoint, typically a camera.
pub trait Observer {
    /// Local translation of the observer.
    fn translation(&self) -> DVec3;

    /// Moves the observer.
    fn set_translation(&mut self, translation: DVec3);

    /// Orientation of the observer.
    fn rotation(&self) -> DQuat;

    /// Rotates the observer.
    fn set_rotation(&mut self, rotation: DQuat);
}

/// Plain observer transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverTransform {
    /// Local translation.
    pub translation: DVec3,
    /// Orientation.
    pub rotation: DQuat,
}

impl ObserverTransform {
    /// Observer at `translation` with identity rotation.
    #[must_use]
    pub const fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }
}

impl Default for ObserverTransform {
    fn default() -> Self {
        Self::from_translation(DVec3::ZERO)
    }
}

impl Observer for ObserverTransform {
    fn translation(&self) -> DVec3 {
        self.translation
    }

    fn set_translation(&mut self, translation: DVec3) {
        self.translation = translation;
    }

    fn rotation(&self) -> DQuat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: DQuat) {
        self.rotation = rotation;
    }
}

/// Shared observer transform.
///
/// Clones refer to the same transform, so a movement target can own one
/// handle while a renderer copies the latest state from another.
#[derive(Debug, Clone, Default)]
pub struct ObserverHandle(Arc<RwLock<ObserverTransform>>);

impl ObserverHandle {
    /// Wraps `transform` in a shareable handle.
    #[must_use]
    pub fn new(transform: ObserverTransform) -> Self {
        Self(Arc::new(RwLock::new(transform)))
    }

    /// Copy of the current transform.
    #[must_use]
    pub fn snapshot(&self) -> ObserverTransform {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn modify(&self, apply: impl FnOnce(&mut ObserverTransform)) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
    }
}

impl Observer for ObserverHandle {
    fn translation(&self) -> DVec3 {
        self.snapshot().translation
    }

    fn set_translation(&mut self, translation: DVec3) {
        self.modify(|transform| transform.translation = translation);
    }

    fn rotation(&self) -> DQuat {
        self.snapshot().rotation
    }

    fn set_rotation(&mut self, rotation: DQuat) {
        self.modify(|transform| transform.rotation = rotation);
    }
}
