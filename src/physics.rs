//! Physics helper functions.
//!
//! Pure per-tick integration helpers shared by the walking target and its
//! tests. They take plain `glam` values and never touch the field.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::REST_SPEED_EPSILON;

/// How horizontal velocity decays on ticks without a movement impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrakingProfile {
    /// `v *= e^(-rate * dt)`.
    #[default]
    Exponential,
    /// Speed drops by `rate * dt` per tick, never reversing direction.
    Linear,
}

/// Clamps a vertical velocity into `[-terminal, terminal]`.
///
/// # Examples
///
/// ```
/// use fieldwalk::physics::clamp_terminal_velocity;
/// assert_eq!(clamp_terminal_velocity(-25.0, 10.0), -10.0);
/// assert_eq!(clamp_terminal_velocity(3.0, 10.0), 3.0);
/// ```
#[must_use]
pub fn clamp_terminal_velocity(vertical: f64, terminal: f64) -> f64 {
    let limit = terminal.abs();
    vertical.clamp(-limit, limit)
}

/// Applies one tick of braking to a horizontal velocity.
///
/// Speeds below [`REST_SPEED_EPSILON`] after braking snap to zero so the body
/// can come to rest.
///
/// # Examples
///
/// ```
/// use fieldwalk::physics::{brake_horizontal, BrakingProfile};
/// use glam::DVec2;
/// let slowed = brake_horizontal(DVec2::new(4.0, 0.0), 10.0, 0.1, BrakingProfile::Linear);
/// assert!((slowed.x - 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn brake_horizontal(velocity: DVec2, rate: f64, dt: f64, profile: BrakingProfile) -> DVec2 {
    let braked = match profile {
        BrakingProfile::Exponential => velocity * (-rate * dt).exp(),
        BrakingProfile::Linear => {
            let speed = velocity.length();
            let reduced = (speed - rate * dt).max(0.0);
            if speed > 0.0 {
                velocity * (reduced / speed)
            } else {
                DVec2::ZERO
            }
        }
    };
    if braked.length() < REST_SPEED_EPSILON {
        DVec2::ZERO
    } else {
        braked
    }
}

/// Returns `true` when a contact normal is flat enough to stand on.
#[must_use]
pub const fn is_standing(normal: DVec3, slope: f64) -> bool {
    normal.y > slope
}
