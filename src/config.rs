//! Runtime configuration loaded from JSON.
//!
//! Every section implements `Default` and is marked `#[serde(default)]`, so a
//! file only needs to mention the values it overrides:
//!
//! ```
//! use fieldwalk::config::FieldwalkConfig;
//! let config = FieldwalkConfig::from_json_str(r#"{ "walker": { "gravity": 9.81 } }"#)
//!     .expect("partial configuration is valid");
//! assert_eq!(config.walker.gravity, 9.81);
//! assert_eq!(config.walker.eye_height, fieldwalk::EYE_HEIGHT);
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FieldError};
use crate::navigation::NavigationSettings;
use crate::numeric::is_positive_finite;
use crate::physics::BrakingProfile;
use crate::{
    AGENT_RADIUS, BRAKING_DECELERATION, CACHE_HALF_EXTENT, EYE_HEIGHT, FLOOR_LEVEL, GRAVITY_PULL,
    MAX_CACHE_HALF_EXTENT, MIN_CACHE_HALF_EXTENT, REST_TICKS, STANDING_SLOPE, TERMINAL_VELOCITY,
};

/// Physical parameters of a walking agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerSettings {
    /// Collision radius; must be positive.
    pub radius: f64,
    /// Height of the eye above the body position.
    pub eye_height: f64,
    /// Downward acceleration while airborne.
    pub gravity: f64,
    /// Largest vertical speed in either direction.
    pub terminal_velocity: f64,
    /// Braking strength: a rate for exponential braking, a deceleration for
    /// linear braking.
    pub braking_rate: f64,
    /// How horizontal velocity decays without input.
    pub braking: BrakingProfile,
    /// Minimum vertical normal component that counts as ground.
    pub standing_slope: f64,
    /// Elevation the body cannot sink below, if any.
    pub floor_level: Option<f64>,
    /// Quiet ticks before the body sleeps; zero disables sleeping.
    pub rest_ticks: u32,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            radius: AGENT_RADIUS,
            eye_height: EYE_HEIGHT,
            gravity: GRAVITY_PULL,
            terminal_velocity: TERMINAL_VELOCITY,
            braking_rate: BRAKING_DECELERATION,
            braking: BrakingProfile::default(),
            standing_slope: STANDING_SLOPE,
            floor_level: Some(FLOOR_LEVEL),
            rest_ticks: REST_TICKS,
        }
    }
}

impl WalkerSettings {
    /// Checks that every parameter is usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositiveRadius`] for a radius that is not
    /// strictly positive and [`ConfigError::InvalidParameter`] for negative
    /// or non-finite physics values or a slope outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive_finite(self.radius) {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        for (name, value) in [
            ("eye_height", self.eye_height),
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("braking_rate", self.braking_rate),
        ] {
            require_non_negative(name, value)?;
        }
        if !(self.standing_slope > 0.0 && self.standing_slope <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "standing_slope",
                value: self.standing_slope,
            });
        }
        match self.floor_level {
            Some(level) if !level.is_finite() => Err(ConfigError::InvalidParameter {
                name: "floor_level",
                value: level,
            }),
            _ => Ok(()),
        }
    }
}

/// Sampling window used by cached colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Half extent `r` of the `(2r + 1)^3` window.
    pub half_extent: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            half_extent: CACHE_HALF_EXTENT,
        }
    }
}

impl CacheSettings {
    /// Checks the window size against the supported range.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidWindow`] wrapped in [`ConfigError`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.half_extent < MIN_CACHE_HALF_EXTENT || self.half_extent > MAX_CACHE_HALF_EXTENT {
            return Err(ConfigError::Field(FieldError::InvalidWindow {
                half_extent: self.half_extent,
                minimum: MIN_CACHE_HALF_EXTENT,
                maximum: MAX_CACHE_HALF_EXTENT,
            }));
        }
        Ok(())
    }
}

/// Complete configuration for a walking session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldwalkConfig {
    /// Agent physics.
    pub walker: WalkerSettings,
    /// Collider cache window.
    pub cache: CacheSettings,
    /// Navigation speeds.
    pub navigation: NavigationSettings,
}

impl FieldwalkConfig {
    /// Validates every section.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.walker.validate()?;
        self.cache.validate()?;
        self.navigation.validate()
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed input and any validation
    /// error for out-of-range values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        debug!("loading configuration from {}", path_ref.display());
        let text = fs::read_to_string(path_ref)?;
        Self::from_json_str(&text)
    }
}

/// Rejects negative or non-finite values for `name`.
pub(crate) const fn require_non_negative(
    name: &'static str,
    value: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Rejects zero, negative or non-finite values for `name`.
pub(crate) const fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if is_positive_finite(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
