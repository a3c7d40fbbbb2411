//! Logger installation for the binary and tests.
//!
//! Library code only talks to the `log` facade; per-tick decisions go to
//! `trace`, cache refills and world recentring to `debug`, and recovered
//! numerical degeneracies to `warn`.

use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages are printed; otherwise only info
/// and above. `RUST_LOG` overrides either default.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);

    // Tests may call `init` repeatedly; only the first installation wins.
    if builder.try_init().is_err() {
        debug!("logger already installed");
    }
}
