//! Bevy plugin driving the active movement target once per frame.
//!
//! The simulation itself is engine-agnostic. This module only moves data
//! across the boundary: navigation input in, `update(dt)` with a clamped frame
//! delta, and the observer transform back out onto camera entities. Every
//! resource is optional, so the plugin stays inert until an
//! [`ActiveMovement`] is inserted.

use std::fmt;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, error};
use thiserror::Error;

use crate::error::MovementError;
use crate::hud::LocationReadout;
use crate::movement::{MovementTarget, ObserverHandle};
use crate::navigation::Navigator;
use crate::MAX_DELTA_SECONDS;

/// Marker for camera entities that follow the observer transform.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct MovementCamera;

/// Frame timing limits.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct MovementSettings {
    /// Longest frame delta fed to the simulation, in seconds.
    ///
    /// Frame hitches are clamped so a single tick cannot tunnel through
    /// thin ground.
    pub max_delta_seconds: f64,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_delta_seconds: MAX_DELTA_SECONDS,
        }
    }
}

impl MovementSettings {
    /// Clamps a frame delta into `[0, max_delta_seconds]`.
    #[must_use]
    pub fn clamp_delta(&self, delta: f64) -> f64 {
        let limit = self.max_delta_seconds.max(f64::EPSILON);
        if delta.is_finite() {
            delta.clamp(0.0, limit)
        } else {
            0.0
        }
    }
}

/// Movement target type stored by [`ActiveMovement`].
pub type SharedTarget = Box<dyn MovementTarget + Send + Sync>;

/// The terminal movement target and the observer it ultimately drives.
#[derive(Resource)]
pub struct ActiveMovement {
    target: SharedTarget,
    observer: ObserverHandle,
}

impl ActiveMovement {
    /// Installs `target`; `observer` must be the handle the target writes to.
    #[must_use]
    pub fn new(
        target: impl MovementTarget + Send + Sync + 'static,
        observer: ObserverHandle,
    ) -> Self {
        Self {
            target: Box::new(target),
            observer,
        }
    }

    /// The active target.
    #[must_use]
    pub fn target(&self) -> &(dyn MovementTarget + Send + Sync) {
        self.target.as_ref()
    }

    /// Mutable access to the active target.
    pub fn target_mut(&mut self) -> &mut (dyn MovementTarget + Send + Sync) {
        self.target.as_mut()
    }

    /// Observer copied onto [`MovementCamera`] entities.
    #[must_use]
    pub const fn observer(&self) -> &ObserverHandle {
        &self.observer
    }
}

impl fmt::Debug for ActiveMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveMovement")
            .field("location", &self.target.location())
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

/// Navigation state fed by the application's input mapping.
#[derive(Resource, Debug, Clone, Default)]
pub struct Navigation(pub Navigator);

/// World position label refreshed each frame.
#[derive(Resource, Debug, Clone)]
pub struct LocationHud(pub LocationReadout);

/// Event raised when advancing the movement target fails.
#[derive(Event, Debug, Clone, Copy, PartialEq, Error)]
#[error("movement tick failed: {0}")]
pub struct MovementTickError(pub MovementError);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_movement_error(event: On<MovementTickError>) {
    error!("{}", event.event());
}

fn frame_delta(time: &Time, settings: &MovementSettings) -> f64 {
    settings.clamp_delta(time.delta_secs_f64())
}

/// Applies navigation facing and movement to the active target.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn navigate_system(
    time: Res<Time>,
    settings: Res<MovementSettings>,
    navigation: Option<Res<Navigation>>,
    active: Option<ResMut<ActiveMovement>>,
) {
    let (Some(navigation), Some(mut active)) = (navigation, active) else {
        return;
    };
    let dt = frame_delta(&time, &settings);
    let navigator = &navigation.0;
    navigator.apply_facing(active.target_mut());
    if dt > 0.0 {
        navigator.tick(active.target_mut(), dt);
    }
}

/// Advances the active target by the clamped frame delta.
///
/// Zero-length frames are skipped. Failures are raised as
/// [`MovementTickError`] events.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn advance_movement_system(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<MovementSettings>,
    active: Option<ResMut<ActiveMovement>>,
) {
    let Some(mut active) = active else {
        return;
    };
    let dt = frame_delta(&time, &settings);
    if dt <= 0.0 {
        return;
    }
    if let Err(err) = active.target_mut().update(dt) {
        commands.trigger(MovementTickError(err));
    }
}

/// Copies the observer transform onto every [`MovementCamera`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_camera_system(
    active: Option<Res<ActiveMovement>>,
    mut cameras: Query<&mut Transform, With<MovementCamera>>,
) {
    let Some(active) = active else {
        return;
    };
    let observer = active.observer().snapshot();
    for mut transform in &mut cameras {
        transform.translation = observer.translation.as_vec3();
        transform.rotation = observer.rotation.as_quat();
    }
}

/// Reformats the location label when the world position changed.
pub fn refresh_location_system(hud: Option<ResMut<LocationHud>>) {
    let Some(mut hud) = hud else {
        return;
    };
    if hud.0.refresh() {
        debug!("world position {}", hud.0.text());
    }
}

/// Bevy plugin installing the movement systems.
#[derive(Debug, Default)]
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovementCamera>();
        app.init_resource::<MovementSettings>();
        app.add_observer(log_movement_error);
        app.add_systems(
            Update,
            (
                navigate_system,
                advance_movement_system,
                sync_camera_system,
                refresh_location_system,
            )
                .chain(),
        );
    }
}
