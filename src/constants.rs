//! Tunable defaults shared by the field, collision and movement layers.
//!
//! Distances are in field units (one unit is one density sample spacing) and
//! times in seconds. Runtime code reads these through
//! [`WalkerSettings`](crate::config::WalkerSettings) and friends so a
//! configuration file can override them.

/// Downward acceleration applied to a falling body, in units per second squared.
pub const GRAVITY_PULL: f64 = 10.0;
/// Maximum vertical speed a body may reach, in units per second.
pub const TERMINAL_VELOCITY: f64 = 10.0;
/// Horizontal braking rate once movement input stops.
///
/// Units per second squared for linear braking, reciprocal seconds for
/// exponential braking.
pub const BRAKING_DECELERATION: f64 = 10.0;
/// Radius of a walking agent's collision sphere.
pub const AGENT_RADIUS: f64 = 0.2;
/// Height of the observer's eye above the body position.
pub const EYE_HEIGHT: f64 = 1.5;
/// Minimum vertical component of a contact normal that counts as ground.
///
/// Roughly a 45 degree slope.
pub const STANDING_SLOPE: f64 = 0.707_11;
/// Elevation below which a body is held, standing in for a water level.
pub const FLOOR_LEVEL: f64 = -10.0;
/// Consecutive quiet ticks after which a walking body goes to sleep.
pub const REST_TICKS: u32 = 8;
/// Displacement or speed under which a tick counts as quiet.
pub const REST_EPSILON: f64 = 1e-4;
/// Horizontal speed under which braking snaps velocity to zero.
pub const REST_SPEED_EPSILON: f64 = 0.001;

/// Spacing used for central-difference gradients and cache lattices.
pub const FIELD_SAMPLE_STEP: f64 = 1.0;
/// Distance between the centre and tip samples of a penetration probe.
pub const PROBE_DISTANCE: f64 = 1.0;
/// Fallback penetration for degenerate probe samples.
pub const PENETRATION_EPSILON: f64 = 1e-6;
/// Longest distance a walking body may travel in one integration step.
///
/// Half the probe distance, so a body that lands inside solid still has its
/// probe tip in air.
pub const MAX_SUBSTEP_TRAVEL: f64 = 0.5 * PROBE_DISTANCE;
/// Upper bound on integration steps per tick.
pub const MAX_SUBSTEPS: u32 = 64;
/// Gradient magnitude under which a field region is treated as flat.
pub const GRADIENT_EPSILON: f64 = 1e-9;

/// Default cache half extent, giving a 17 sample core window.
pub const CACHE_HALF_EXTENT: u32 = 8;
/// Smallest accepted cache half extent.
pub const MIN_CACHE_HALF_EXTENT: u32 = 3;
/// Largest accepted cache half extent.
pub const MAX_CACHE_HALF_EXTENT: u32 = 64;
/// Samples that must separate a covered origin from every window face.
pub const CACHE_MARGIN: i32 = 3;

/// Turn rate for look input, in radians per second.
pub const TURN_SPEED: f64 = 2.5;
/// Movement speed while walking.
pub const WALK_SPEED: f64 = 3.0;
/// Movement speed while running.
pub const RUN_SPEED: f64 = 10.0;
/// Movement speed while sprinting.
pub const SUPER_RUN_SPEED: f64 = 20.0;

/// Fixed step used by the headless binary.
pub const DELTA_TIME: f64 = 1.0 / 60.0;
/// Largest frame delta the engine plugin feeds into a tick.
pub const MAX_DELTA_SECONDS: f64 = 0.1;
