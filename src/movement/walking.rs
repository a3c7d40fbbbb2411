//! Physics wrapper that walks an inner target over solid ground.
//!
//! Requested locations become horizontal impulses; gravity, terminal velocity,
//! a floor clamp and contact resolution are integrated on every
//! [`MovementTarget::update`], split into as many steps as keep each step's
//! travel under [`MAX_SUBSTEP_TRAVEL`]. Braking follows once per tick. The
//! inner target receives the body position raised by the eye height.

use glam::{DQuat, DVec3};
use log::{debug, trace};

use super::MovementTarget;
use crate::collision::Collider;
use crate::config::WalkerSettings;
use crate::error::{ConfigError, MovementError};
use crate::physics::{brake_horizontal, clamp_terminal_velocity, is_standing};
use crate::vector_math::{horizontal, with_horizontal};
use crate::{MAX_SUBSTEPS, MAX_SUBSTEP_TRAVEL, REST_EPSILON};

/// Coarse motion state of a walking body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// No standing contact; gravity applies.
    Falling,
    /// Standing on ground flatter than the slope threshold.
    Grounded,
    /// Asleep until the next movement request.
    Resting,
}

/// Movement target adding gravity and terrain collision to `inner`.
#[derive(Debug, Clone)]
pub struct WalkingTarget<T, C> {
    inner: T,
    collider: C,
    settings: WalkerSettings,
    position: DVec3,
    last_position: DVec3,
    velocity: DVec3,
    acceleration: DVec3,
    movement: DVec3,
    moving: bool,
    grounded: bool,
    quiet_ticks: u32,
}

impl<T: MovementTarget, C: Collider> WalkingTarget<T, C> {
    /// Wraps `inner`, starting the body one eye height below its location.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `settings` fail validation.
    pub fn new(inner: T, collider: C, settings: WalkerSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let position = inner.location() - DVec3::Y * settings.eye_height;
        Ok(Self {
            inner,
            collider,
            settings,
            position,
            last_position: position,
            velocity: DVec3::ZERO,
            acceleration: DVec3::NEG_Y * settings.gravity,
            movement: DVec3::ZERO,
            moving: false,
            grounded: false,
            quiet_ticks: 0,
        })
    }

    /// Body (feet) position.
    #[must_use]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Acceleration applied on the next tick.
    #[must_use]
    pub const fn acceleration(&self) -> DVec3 {
        self.acceleration
    }

    /// Whether the last tick ended on standing ground.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a movement request is pending for the next tick.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether the body has been quiet long enough to sleep.
    #[must_use]
    pub const fn is_resting(&self) -> bool {
        self.settings.rest_ticks > 0 && self.quiet_ticks >= self.settings.rest_ticks
    }

    /// Coarse motion state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        if self.is_resting() {
            AgentState::Resting
        } else if self.grounded {
            AgentState::Grounded
        } else {
            AgentState::Falling
        }
    }

    /// The wrapped target.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// The collider resolving contacts.
    #[must_use]
    pub const fn collider(&self) -> &C {
        &self.collider
    }

    /// Active physical parameters.
    #[must_use]
    pub const fn settings(&self) -> &WalkerSettings {
        &self.settings
    }

    /// Teleports the body, discarding velocity and pending movement.
    pub fn set_body_position(&mut self, position: DVec3) {
        self.position = position;
        self.last_position = position;
        self.velocity = DVec3::ZERO;
        self.movement = DVec3::ZERO;
        self.moving = false;
        self.grounded = false;
        self.quiet_ticks = 0;
        self.acceleration = DVec3::NEG_Y * self.settings.gravity;
        self.inner.set_location(self.eye_position());
    }

    fn eye_position(&self) -> DVec3 {
        self.position + DVec3::Y * self.settings.eye_height
    }

    /// Integration steps needed so no step outruns the penetration probe.
    fn substeps(&self, dt: f64) -> u32 {
        let next = clamp_terminal_velocity(
            self.acceleration.y.mul_add(dt, self.velocity.y),
            self.settings.terminal_velocity,
        );
        let vertical = self.velocity.y.abs().max(next.abs());
        let travel = horizontal(self.velocity).length().hypot(vertical) * dt;
        substep_count(travel)
    }

    fn integrate(&mut self, dt: f64) -> Result<(), MovementError> {
        if self.moving {
            self.velocity = with_horizontal(self.velocity, horizontal(self.movement / dt));
        }
        self.last_position = self.position;
        let steps = self.substeps(dt);
        if steps > 1 {
            trace!("splitting tick of {dt}s into {steps} steps");
        }
        let step = dt / f64::from(steps);
        for _ in 0..steps {
            self.step(step)?;
        }
        Ok(())
    }

    fn step(&mut self, dt: f64) -> Result<(), MovementError> {
        self.velocity += self.acceleration * dt;
        self.velocity.y = clamp_terminal_velocity(self.velocity.y, self.settings.terminal_velocity);
        self.position += self.velocity * dt;

        if let Some(floor) = self.settings.floor_level {
            if self.position.y < floor {
                trace!("holding body at floor level {floor}");
                self.position.y = floor;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }

        let contact = self.collider.contact(self.position, self.settings.radius)?;
        if let Some(hit) = contact {
            self.position += hit.correction();
        }
        let slope = self.settings.standing_slope;
        self.grounded = contact.is_some_and(|hit| is_standing(hit.normal, slope));
        if self.grounded {
            self.acceleration = DVec3::ZERO;
            self.velocity.y = 0.0;
        } else {
            self.acceleration = DVec3::NEG_Y * self.settings.gravity;
        }
        Ok(())
    }

    fn brake(&mut self, dt: f64) {
        let planar = brake_horizontal(
            horizontal(self.velocity),
            self.settings.braking_rate,
            dt,
            self.settings.braking,
        );
        self.velocity = with_horizontal(self.velocity, planar);
    }

    fn track_rest(&mut self) {
        let displacement = self.position.distance(self.last_position);
        if displacement < REST_EPSILON && self.velocity.length() < REST_EPSILON {
            self.quiet_ticks = self.quiet_ticks.saturating_add(1);
            if self.quiet_ticks == self.settings.rest_ticks {
                debug!("walking body at rest at {}", self.position);
            }
        } else {
            self.quiet_ticks = 0;
        }
    }
}

/// Steps of at most [`MAX_SUBSTEP_TRAVEL`] covering `travel`, between one and
/// [`MAX_SUBSTEPS`].
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The count is clamped to 1..=MAX_SUBSTEPS before casting."
)]
fn substep_count(travel: f64) -> u32 {
    if travel.is_nan() {
        return 1;
    }
    let steps = (travel / MAX_SUBSTEP_TRAVEL)
        .ceil()
        .clamp(1.0, f64::from(MAX_SUBSTEPS));
    steps as u32
}

impl<T: MovementTarget, C: Collider> MovementTarget for WalkingTarget<T, C> {
    /// Records the horizontal offset from the body to `location` as this
    /// tick's movement; elevation is left to gravity.
    fn set_location(&mut self, location: DVec3) {
        self.movement = with_horizontal(DVec3::ZERO, horizontal(location - self.position));
        self.moving = true;
        self.quiet_ticks = 0;
    }

    fn location(&self) -> DVec3 {
        self.inner.location()
    }

    fn set_facing(&mut self, facing: DQuat) {
        self.inner.set_facing(facing);
    }

    fn facing(&self) -> DQuat {
        self.inner.facing()
    }

    fn update(&mut self, dt: f64) -> Result<(), MovementError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(MovementError::InvalidTick(dt));
        }
        if self.is_resting() {
            return self.inner.update(dt);
        }
        self.integrate(dt)?;
        self.inner.set_location(self.eye_position());
        if self.moving {
            self.moving = false;
            self.movement = DVec3::ZERO;
        } else {
            self.brake(dt);
        }
        self.track_rest();
        self.inner.update(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Contact, DirectCollider, FieldCollider};
    use crate::error::FieldError;
    use crate::field::{Ball, HalfSpace};
    use crate::movement::{DirectTarget, ObserverTransform};
    use crate::physics::BrakingProfile;
    use crate::DELTA_TIME;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    type Walker<C> = WalkingTarget<DirectTarget<ObserverTransform>, C>;

    fn walker_at<C: Collider>(eye: DVec3, collider: C, settings: WalkerSettings) -> Walker<C> {
        let observer = ObserverTransform::from_translation(eye);
        WalkingTarget::new(DirectTarget::new(observer), collider, settings)
            .expect("valid walker settings")
    }

    #[fixture]
    fn grounded() -> Walker<DirectCollider<HalfSpace>> {
        let mut walker = walker_at(
            DVec3::new(0.0, 1.5, 0.0),
            FieldCollider::direct(HalfSpace::below(0.0)),
            WalkerSettings::default(),
        );
        for _ in 0..30 {
            walker.update(DELTA_TIME).expect("tick");
        }
        walker
    }

    struct NoGround;

    impl Collider for NoGround {
        fn contact(&mut self, _: DVec3, _: f64) -> Result<Option<Contact>, FieldError> {
            Ok(None)
        }
    }

    struct BrokenCache;

    impl Collider for BrokenCache {
        fn contact(&mut self, _: DVec3, _: f64) -> Result<Option<Contact>, FieldError> {
            Err(FieldError::EmptyWindow)
        }
    }

    #[test]
    fn rejects_invalid_radius() {
        let settings = WalkerSettings {
            radius: 0.0,
            ..WalkerSettings::default()
        };
        let result = WalkingTarget::new(
            DirectTarget::new(ObserverTransform::default()),
            NoGround,
            settings,
        );
        assert!(matches!(result, Err(ConfigError::NonPositiveRadius(_))));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-0.1)]
    #[case::nan(f64::NAN)]
    fn rejects_invalid_ticks(#[case] dt: f64) {
        let mut walker = walker_at(DVec3::ZERO, NoGround, WalkerSettings::default());
        assert!(matches!(walker.update(dt), Err(MovementError::InvalidTick(_))));
    }

    #[test]
    fn body_starts_below_the_eye() {
        let walker = walker_at(DVec3::new(2.0, 7.5, -1.0), NoGround, WalkerSettings::default());
        assert_eq!(walker.position(), DVec3::new(2.0, 6.0, -1.0));
    }

    #[test]
    fn free_fall_respects_terminal_velocity() {
        let settings = WalkerSettings {
            floor_level: None,
            ..WalkerSettings::default()
        };
        let mut walker = walker_at(DVec3::ZERO, NoGround, settings);
        for _ in 0..2_000 {
            walker.update(DELTA_TIME).expect("tick");
            assert!(walker.velocity().y.abs() <= settings.terminal_velocity);
        }
        assert_relative_eq!(walker.velocity().y, -settings.terminal_velocity);
        assert_eq!(walker.state(), AgentState::Falling);
    }

    #[test]
    fn floor_clamp_holds_the_body() {
        let mut walker = walker_at(DVec3::ZERO, NoGround, WalkerSettings::default());
        for _ in 0..600 {
            walker.update(DELTA_TIME).expect("tick");
        }
        assert!(walker.position().y >= crate::FLOOR_LEVEL);
    }

    #[rstest]
    fn settles_on_flat_ground(grounded: Walker<DirectCollider<HalfSpace>>) {
        assert_relative_eq!(grounded.position().y, 0.0, epsilon = 1e-5);
        assert_eq!(grounded.velocity().y, 0.0);
        assert_relative_eq!(grounded.location().y, 1.5, epsilon = 1e-5);
    }

    #[rstest]
    fn resting_body_stays_put(
        mut grounded: Walker<DirectCollider<HalfSpace>>,
    ) {
        assert!(grounded.is_resting());
        let before = grounded.position();
        for _ in 0..120 {
            grounded.update(DELTA_TIME).expect("tick");
        }
        assert_eq!(grounded.position(), before);
        assert_eq!(grounded.state(), AgentState::Resting);
    }

    #[rstest]
    fn impulse_moves_horizontally_then_brakes(
        mut grounded: Walker<DirectCollider<HalfSpace>>,
    ) {
        let start = grounded.position();
        grounded.set_location(grounded.location() + DVec3::new(0.05, 3.0, 0.0));
        assert!(grounded.is_moving());
        grounded.update(DELTA_TIME).expect("tick");
        assert!(!grounded.is_moving());
        assert_relative_eq!(grounded.position().x - start.x, 0.05, epsilon = 1e-9);
        assert_relative_eq!(grounded.velocity().x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(grounded.position().y, 0.0, epsilon = 1e-5);

        for _ in 0..600 {
            grounded.update(DELTA_TIME).expect("tick");
        }
        assert_eq!(grounded.velocity().x, 0.0);
        assert!(grounded.is_resting());
    }

    #[rstest]
    #[case(6.713)]
    #[case(7.8)]
    #[case(9.35)]
    #[case(10.8)]
    fn coarse_ticks_never_bury_the_body(#[case] height: f64) {
        let settings = WalkerSettings {
            terminal_velocity: 20.0,
            ..WalkerSettings::default()
        };
        let mut walker = walker_at(
            DVec3::new(0.0, height + settings.eye_height, 0.0),
            FieldCollider::direct(HalfSpace::below(0.0)),
            settings,
        );
        for tick in 0..100 {
            walker.update(0.1).expect("tick");
            let y = walker.position().y;
            assert!(y > -1e-5, "tick {tick}: body sank to {y}");
        }
        assert_relative_eq!(walker.position().y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(walker.location().y, settings.eye_height, epsilon = 1e-5);
    }

    #[rstest]
    #[case::still(0.0, 1)]
    #[case::within_one_step(MAX_SUBSTEP_TRAVEL, 1)]
    #[case::just_over(MAX_SUBSTEP_TRAVEL + 1e-9, 2)]
    #[case::fast(2.0, 4)]
    #[case::capped(1e9, MAX_SUBSTEPS)]
    #[case::nan(f64::NAN, 1)]
    fn travel_splits_into_bounded_steps(#[case] travel: f64, #[case] expected: u32) {
        assert_eq!(substep_count(travel), expected);
    }

    #[test]
    fn linear_braking_stops_within_bound() {
        let settings = WalkerSettings {
            braking: BrakingProfile::Linear,
            ..WalkerSettings::default()
        };
        let mut walker = walker_at(
            DVec3::new(0.0, 1.5, 0.0),
            FieldCollider::direct(HalfSpace::below(0.0)),
            settings,
        );
        walker.set_location(DVec3::new(0.1, 1.5, 0.0));
        walker.update(DELTA_TIME).expect("tick");
        assert_relative_eq!(walker.velocity().x, 6.0, epsilon = 1e-9);
        // 6 u/s at 10 u/s² needs 36 ticks of 1/60 s.
        for _ in 0..36 {
            walker.update(DELTA_TIME).expect("tick");
        }
        assert_eq!(walker.velocity().x, 0.0);
    }

    #[test]
    fn steep_contact_keeps_falling() {
        // Side of a ball: the outward normal is nearly horizontal.
        let ball = Ball::new(DVec3::ZERO, 5.0);
        let mut walker = walker_at(
            DVec3::new(4.9, 1.5, 0.0),
            FieldCollider::direct(ball),
            WalkerSettings::default(),
        );
        walker.update(DELTA_TIME).expect("tick");
        assert!(!walker.is_grounded());
        assert_eq!(walker.acceleration(), DVec3::NEG_Y * walker.settings().gravity);
        assert!(walker.position().x > 4.9);
    }

    #[test]
    fn collider_errors_propagate() {
        let mut walker = walker_at(DVec3::ZERO, BrokenCache, WalkerSettings::default());
        assert_eq!(
            walker.update(DELTA_TIME),
            Err(MovementError::Field(FieldError::EmptyWindow))
        );
    }

    #[test]
    fn teleport_resets_motion() {
        let mut walker = walker_at(DVec3::ZERO, NoGround, WalkerSettings::default());
        walker.update(DELTA_TIME).expect("tick");
        walker.set_body_position(DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(walker.velocity(), DVec3::ZERO);
        assert_eq!(walker.location(), DVec3::new(10.0, 21.5, 30.0));
    }

    #[test]
    fn facing_reaches_inner_target() {
        let mut walker = walker_at(DVec3::ZERO, NoGround, WalkerSettings::default());
        walker.set_facing(DQuat::from_rotation_y(1.0));
        assert_eq!(walker.inner().facing(), DQuat::from_rotation_y(1.0));
    }
}
