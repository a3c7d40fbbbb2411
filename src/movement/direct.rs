//! Pass-through target writing straight to the observer.

use glam::{DQuat, DVec3};

use super::{MovementTarget, Observer};

/// Moves the observer itself; world and observer coordinates coincide.
#[derive(Debug, Clone, Default)]
pub struct DirectTarget<O> {
    observer: O,
}

impl<O: Observer> DirectTarget<O> {
    /// Drives `observer` directly.
    #[must_use]
    pub const fn new(observer: O) -> Self {
        Self { observer }
    }

    /// The driven observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Releases the observer.
    #[must_use]
    pub fn into_inner(self) -> O {
        self.observer
    }
}

impl<O: Observer> MovementTarget for DirectTarget<O> {
    fn set_location(&mut self, location: DVec3) {
        self.observer.set_translation(location);
    }

    fn location(&self) -> DVec3 {
        self.observer.translation()
    }

    fn set_facing(&mut self, facing: DQuat) {
        self.observer.set_rotation(facing);
    }

    fn facing(&self) -> DQuat {
        self.observer.rotation()
    }
}
