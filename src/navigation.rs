//! Look and move input integration.
//!
//! [`Navigator`] turns axis values (already mapped from whatever input device
//! the application uses) into a facing and a per-tick requested location for
//! the active [`MovementTarget`].

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DQuat, DVec3, EulerRot};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::require_positive;
use crate::error::ConfigError;
use crate::movement::MovementTarget;
use crate::{RUN_SPEED, SUPER_RUN_SPEED, TURN_SPEED, WALK_SPEED};

/// Turn and travel speeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Radians per second per unit of look input.
    pub turn_speed: f64,
    /// Units per second while walking.
    pub walk_speed: f64,
    /// Units per second while running.
    pub run_speed: f64,
    /// Units per second while super running.
    pub super_run_speed: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            turn_speed: TURN_SPEED,
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            super_run_speed: SUPER_RUN_SPEED,
        }
    }
}

impl NavigationSettings {
    /// Checks that every speed is positive and finite.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad speed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("turn_speed", self.turn_speed)?;
        require_positive("walk_speed", self.walk_speed)?;
        require_positive("run_speed", self.run_speed)?;
        require_positive("super_run_speed", self.super_run_speed)
    }
}

/// Travel speed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gait {
    /// Default pace.
    #[default]
    Walk,
    /// Faster pace.
    Run,
    /// Fastest pace, for crossing large areas.
    SuperRun,
}

impl Gait {
    /// Speed of this gait under `settings`.
    #[must_use]
    pub const fn speed(self, settings: &NavigationSettings) -> f64 {
        match self {
            Self::Walk => settings.walk_speed,
            Self::Run => settings.run_speed,
            Self::SuperRun => settings.super_run_speed,
        }
    }
}

/// Movement input along the facing's local axes, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveAxes {
    /// Along the facing's local `+Z`.
    pub forward: f64,
    /// Along the facing's local `+X`.
    pub strafe: f64,
    /// Along the facing's local `+Y`.
    pub elevation: f64,
}

impl MoveAxes {
    /// Returns the axes with every component clamped into `[-1, 1]` and
    /// non-finite values zeroed.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |value: f64| {
            if value.is_finite() {
                value.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        Self {
            forward: clamp(self.forward),
            strafe: clamp(self.strafe),
            elevation: clamp(self.elevation),
        }
    }

    /// Returns `true` when no axis is deflected.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        DVec3::new(self.strafe, self.elevation, self.forward) == DVec3::ZERO
    }
}

/// Integrates look and move input into facing and location requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    settings: NavigationSettings,
    yaw: f64,
    pitch: f64,
    axes: MoveAxes,
    gait: Gait,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigationSettings::default())
    }
}

impl Navigator {
    /// Creates a navigator facing back along `-Z`.
    #[must_use]
    pub const fn new(settings: NavigationSettings) -> Self {
        Self {
            settings,
            yaw: PI,
            pitch: 0.0,
            axes: MoveAxes {
                forward: 0.0,
                strafe: 0.0,
                elevation: 0.0,
            },
            gait: Gait::Walk,
        }
    }

    /// Orientation built from the current yaw and pitch.
    #[must_use]
    pub fn facing(&self) -> DQuat {
        DQuat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Yaw in radians, within `[0, 2π]`.
    #[must_use]
    pub const fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Pitch in radians, within `[-π/2, π/2]`.
    #[must_use]
    pub const fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Current gait.
    #[must_use]
    pub const fn gait(&self) -> Gait {
        self.gait
    }

    /// Current move axes.
    #[must_use]
    pub const fn axes(&self) -> MoveAxes {
        self.axes
    }

    /// Current travel speed.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.gait.speed(&self.settings)
    }

    /// Selects the travel speed.
    pub const fn set_gait(&mut self, gait: Gait) {
        self.gait = gait;
    }

    /// Replaces the move axes, clamping each into `[-1, 1]`.
    pub fn set_axes(&mut self, axes: MoveAxes) {
        self.axes = axes.clamped();
    }

    /// Applies look input: positive `x` turns right, positive `y` looks down.
    ///
    /// Yaw wraps into `[0, 2π]`; pitch is clamped to straight up or down.
    pub fn look(&mut self, x: f64, y: f64, dt: f64) {
        let turn = self.settings.turn_speed * dt;
        let mut yaw = self.yaw - x * turn;
        if yaw < 0.0 {
            yaw += TAU;
        }
        if yaw > TAU {
            yaw -= TAU;
        }
        self.yaw = yaw;
        self.pitch = (self.pitch - y * turn).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Pushes the current facing to `target`.
    pub fn apply_facing<T: MovementTarget + ?Sized>(&self, target: &mut T) {
        target.set_facing(self.facing());
    }

    /// Moves `target` along its facing for `dt` seconds of input.
    ///
    /// Returns the requested location, or `None` when every axis is idle and
    /// the target was left alone.
    pub fn tick<T: MovementTarget + ?Sized>(&self, target: &mut T, dt: f64) -> Option<DVec3> {
        if self.axes.is_idle() {
            return None;
        }
        let rotation = target.facing();
        let step = self.speed() * dt;
        let travel = rotation * DVec3::Z * self.axes.forward
            + rotation * DVec3::X * self.axes.strafe
            + rotation * DVec3::Y * self.axes.elevation;
        let location = target.location() + travel * step;
        trace!("navigating to {location}");
        target.set_location(location);
        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{DirectTarget, ObserverTransform};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn target() -> DirectTarget<ObserverTransform> {
        DirectTarget::new(ObserverTransform::default())
    }

    #[test]
    fn idle_axes_leave_target_alone() {
        let navigator = Navigator::default();
        let mut target = target();
        assert!(navigator.tick(&mut target, 0.5).is_none());
        assert_eq!(target.location(), DVec3::ZERO);
    }

    #[test]
    fn initial_facing_looks_down_negative_z() {
        let navigator = Navigator::default();
        let mut target = target();
        navigator.apply_facing(&mut target);
        let forward = target.facing() * DVec3::Z;
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case::walk(Gait::Walk, 3.0)]
    #[case::run(Gait::Run, 10.0)]
    #[case::super_run(Gait::SuperRun, 20.0)]
    fn forward_travel_scales_with_gait(#[case] gait: Gait, #[case] speed: f64) {
        let mut navigator = Navigator::default();
        navigator.set_gait(gait);
        navigator.set_axes(MoveAxes {
            forward: 1.0,
            ..MoveAxes::default()
        });
        let mut target = target();
        navigator.apply_facing(&mut target);
        let location = navigator.tick(&mut target, 0.5).expect("axes are active");
        assert_relative_eq!(location.z, -speed * 0.5, epsilon = 1e-9);
        assert_relative_eq!(location.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn axes_are_clamped() {
        let mut navigator = Navigator::default();
        navigator.set_axes(MoveAxes {
            forward: 4.0,
            strafe: -9.0,
            elevation: f64::NAN,
        });
        assert_eq!(
            navigator.axes(),
            MoveAxes {
                forward: 1.0,
                strafe: -1.0,
                elevation: 0.0,
            }
        );
    }

    #[test]
    fn yaw_wraps_into_range() {
        let mut navigator = Navigator::default();
        navigator.look(-1.0, 0.0, 1.0);
        assert_relative_eq!(navigator.yaw(), PI + 2.5, epsilon = 1e-12);
        navigator.look(-1.0, 0.0, 1.0);
        assert_relative_eq!(navigator.yaw(), PI + 5.0 - TAU, epsilon = 1e-12);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut navigator = Navigator::default();
        navigator.look(0.0, -10.0, 1.0);
        assert_relative_eq!(navigator.pitch(), FRAC_PI_2);
        navigator.look(0.0, 10.0, 1.0);
        assert_relative_eq!(navigator.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn settings_reject_zero_speed() {
        let settings = NavigationSettings {
            walk_speed: 0.0,
            ..NavigationSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidParameter { name: "walk_speed", .. })
        ));
    }
}
