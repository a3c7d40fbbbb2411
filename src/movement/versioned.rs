//! Single-writer value cells with change counters.
//!
//! A [`VersionedCell`] pairs a value with a counter that increments on every
//! write. Readers remember the last version they acknowledged and can ask
//! whether anything changed without comparing values.

use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
struct Slot<T> {
    value: T,
    version: u64,
}

/// Writable end of a versioned value. Deliberately not `Clone`.
#[derive(Debug)]
pub struct VersionedCell<T> {
    slot: Arc<RwLock<Slot<T>>>,
}

/// Read-only view of a [`VersionedCell`].
#[derive(Debug)]
pub struct VersionedReader<T> {
    slot: Arc<RwLock<Slot<T>>>,
    seen: u64,
}

impl<T: Clone> VersionedCell<T> {
    /// Creates a cell holding `value` at version zero.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot { value, version: 0 })),
        }
    }

    /// Replaces the value and bumps the version.
    pub fn set(&mut self, value: T) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.value = value;
        slot.version = slot.version.saturating_add(1);
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).version
    }

    /// Creates a reader that has already acknowledged the current version.
    #[must_use]
    pub fn reader(&self) -> VersionedReader<T> {
        VersionedReader {
            slot: Arc::clone(&self.slot),
            seen: self.version(),
        }
    }
}

impl<T: Clone> VersionedReader<T> {
    /// Current value, without acknowledging it.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    /// Current version of the shared value.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).version
    }

    /// Version this reader last acknowledged.
    #[must_use]
    pub const fn seen_version(&self) -> u64 {
        self.seen
    }

    /// Returns `true` if the value was written since the last
    /// [`Self::update`].
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.version() != self.seen
    }

    /// Acknowledges the current version and returns the value it refers to.
    pub fn update(&mut self) -> T {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        self.seen = slot.version;
        slot.value.clone()
    }
}

impl<T> Clone for VersionedReader<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            seen: self.seen,
        }
    }
}
