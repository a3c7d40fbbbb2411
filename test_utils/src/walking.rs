//! Walker fixtures and tick loops.

use fieldwalk::field::HalfSpace;
use fieldwalk::{
    DirectCollider, DirectTarget, FieldCollider, MovementError, MovementTarget,
    ObserverTransform, WalkerSettings, WalkingTarget,
};
use glam::DVec3;

/// Walker over level ground driving a plain observer.
pub type FlatWalker = WalkingTarget<DirectTarget<ObserverTransform>, DirectCollider<HalfSpace>>;

/// Build a walker whose eye starts at `eye` above ground that is solid
/// wherever `y < 0`.
///
/// # Panics
/// Panics if `settings` are invalid.
pub fn flat_ground_walker(eye: DVec3, settings: WalkerSettings) -> FlatWalker {
    let observer = ObserverTransform::from_translation(eye);
    WalkingTarget::new(
        DirectTarget::new(observer),
        FieldCollider::direct(HalfSpace::below(0.0)),
        settings,
    )
    .unwrap_or_else(|err| panic!("invalid walker settings: {err}"))
}

/// Advance `target` by `ticks` steps of `dt`.
///
/// # Errors
/// Returns the first error reported by the target.
pub fn run_ticks<T: MovementTarget + ?Sized>(
    target: &mut T,
    ticks: u32,
    dt: f64,
) -> Result<(), MovementError> {
    for _ in 0..ticks {
        target.update(dt)?;
    }
    Ok(())
}

/// Tick `target` until `done` holds, returning the number of ticks taken or
/// `None` if `max_ticks` elapse first.
///
/// # Panics
/// Panics if the target reports an error.
pub fn ticks_until<T, F>(target: &mut T, max_ticks: u32, dt: f64, mut done: F) -> Option<u32>
where
    T: MovementTarget,
    F: FnMut(&T) -> bool,
{
    for tick in 1..=max_ticks {
        target
            .update(dt)
            .unwrap_or_else(|err| panic!("tick {tick} failed: {err}"));
        if done(target) {
            return Some(tick);
        }
    }
    None
}
