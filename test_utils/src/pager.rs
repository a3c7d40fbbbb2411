//! World pager that records every recentre request.

use std::sync::{Arc, Mutex, PoisonError};

use fieldwalk::WorldRecenter;
use glam::DVec2;

/// Cloneable pager; clones share one log so a test can keep a handle after
/// moving the pager into a target.
#[derive(Clone, Debug, Default)]
pub struct RecordingPager {
    shifts: Arc<Mutex<Vec<DVec2>>>,
}

impl RecordingPager {
    /// Create an empty pager.
    ///
    /// # Examples
    /// ```
    /// use test_utils::RecordingPager;
    /// let pager = RecordingPager::new();
    /// assert_eq!(pager.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(dx, dz)` shift received so far.
    pub fn shifts(&self) -> Vec<DVec2> {
        self.shifts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recentre calls.
    pub fn count(&self) -> usize {
        self.shifts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Sum of all shifts.
    pub fn total(&self) -> DVec2 {
        self.shifts().into_iter().sum()
    }
}

impl WorldRecenter for RecordingPager {
    fn recenter(&mut self, dx: f64, dz: f64) {
        self.shifts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DVec2::new(dx, dz));
    }
}
