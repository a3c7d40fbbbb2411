//! Floating-origin movement and implicit-surface collision.
//!
//! `fieldwalk` moves an observer through worlds whose ground is a scalar
//! density field rather than a mesh. Density fields are sampled directly or
//! through a small owned cache, colliders turn samples into contacts, and
//! movement targets decide whether a requested location moves the observer,
//! shifts the world around it, or becomes an impulse for a walking body.
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod hud;
pub mod logging;
pub mod movement;
pub mod navigation;
pub mod numeric;
pub mod physics;
pub mod plugin;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use collision::{
    estimate_penetration, CachedCollider, Collider, Contact, DirectCollider, DirectField,
    FieldCollider, FieldProbe,
};
pub use config::{CacheSettings, FieldwalkConfig, WalkerSettings};
pub use error::{ConfigError, FieldError, MovementError};
pub use field::{DensityField, LocalFieldCache, DEFAULT_FIELD_DIRECTION};
pub use hud::LocationReadout;
pub use logging::init as init_logging;
pub use movement::{
    AgentState, DirectTarget, FloatingOriginTarget, MovementTarget, Observer, ObserverHandle,
    ObserverTransform, VersionedCell, VersionedReader, WalkingTarget, WorldRecenter,
};
pub use navigation::{Gait, MoveAxes, NavigationSettings, Navigator};
pub use physics::BrakingProfile;
pub use plugin::{ActiveMovement, MovementCamera, MovementPlugin, MovementSettings};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use fieldwalk::prelude::*;
    //! ```

    pub use crate::field::{Ball, HalfSpace, NoiseTerrain};
    pub use crate::Collider;
    pub use crate::DensityField;
    pub use crate::FieldCollider;
    pub use crate::FloatingOriginTarget;
    pub use crate::MovementTarget;
    pub use crate::Navigator;
    pub use crate::WalkerSettings;
    pub use crate::WalkingTarget;
    pub use glam::{DQuat, DVec3};
}
