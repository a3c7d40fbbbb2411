//! Mutex-guarded headless Bevy app running the movement plugin.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use fieldwalk::{MovementPlugin, DELTA_TIME};

/// Wrapper that forwards `Send` and `Sync` because access is mutex-guarded.
#[derive(Debug)]
pub struct HeadlessApp(pub App);

impl Deref for HeadlessApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HeadlessApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: rspec fixtures must be `Clone + Send + Sync`, and suites using this
// wrapper run serially via `run_serial`. Every access goes through the mutex.
unsafe impl Send for HeadlessApp {}
unsafe impl Sync for HeadlessApp {}

/// Shared pointer type for the wrapped app.
pub type SharedApp = Arc<Mutex<HeadlessApp>>;

/// Minimal plugins, the movement plugin and a fixed frame time of
/// [`DELTA_TIME`] seconds.
pub fn movement_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(MovementPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            DELTA_TIME,
        )));
    app
}

/// Wraps `app` for sharing between rspec closures.
pub fn share(app: App) -> SharedApp {
    Arc::new(Mutex::new(HeadlessApp(app)))
}

/// Locks the shared app, recovering from a poisoned mutex.
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, HeadlessApp> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}
