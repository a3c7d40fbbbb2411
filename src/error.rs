//! Error types for field caching, configuration and movement ticks.
//!
//! Configuration errors are raised at construction, range errors are
//! programming mistakes surfaced to the caller, and numerical degeneracies
//! never appear here: they are recovered where they occur.

use glam::IVec3;
use thiserror::Error;

/// Failures raised by cached field queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The requested window half extent is outside the supported range.
    #[error("cache half extent {half_extent} outside {minimum}..={maximum}")]
    InvalidWindow {
        /// Requested half extent.
        half_extent: u32,
        /// Smallest accepted value.
        minimum: u32,
        /// Largest accepted value.
        maximum: u32,
    },
    /// A window-relative coordinate fell outside the cached samples.
    #[error("sample {local} lies outside a window of {edge} samples per axis")]
    OutOfRange {
        /// Offending coordinate, relative to the window base.
        local: IVec3,
        /// Samples per window axis.
        edge: i32,
    },
    /// A window centred on `origin` would leave the `i32` sample lattice.
    #[error("a window of {edge} samples per axis cannot be centred on {origin}")]
    OutsideLattice {
        /// Requested window centre.
        origin: IVec3,
        /// Samples per window axis.
        edge: i32,
    },
    /// The window was queried before its first fill.
    #[error("cache window queried before it was filled")]
    EmptyWindow,
}

/// Failures raised while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Agent radius must be strictly positive.
    #[error("agent radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    /// A physics parameter was negative, non-finite or out of range.
    #[error("{name} is invalid: {value}")]
    InvalidParameter {
        /// Name of the offending setting.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Cache configuration was rejected.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Configuration text was not valid JSON for the expected schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised while advancing a movement target.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MovementError {
    /// Tick durations must be finite and positive.
    #[error("tick duration must be positive and finite, got {0}")]
    InvalidTick(f64),
    /// A cached field query escaped its window.
    #[error(transparent)]
    Field(#[from] FieldError),
}
