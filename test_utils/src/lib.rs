//! Utility helpers for tests.
//!
//! Shared fixtures for the integration suites: a recording world pager,
//! ready-made walkers over analytic ground and tick helpers.

pub mod pager;
pub mod walking;

use glam::DVec3;

pub use pager::RecordingPager;
pub use walking::{flat_ground_walker, run_ticks, ticks_until, FlatWalker};

/// Assert that `actual` lies within `tolerance` of `expected`.
///
/// # Panics
/// Panics with both vectors in the message when they differ by more than
/// `tolerance`.
pub fn assert_vec_near(actual: DVec3, expected: DVec3, tolerance: f64) {
    let distance = actual.distance(expected);
    assert!(
        distance <= tolerance,
        "expected {expected} within {tolerance}, got {actual} ({distance} away)"
    );
}
