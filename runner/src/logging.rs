//! Development-time tracing for debugging suite runs.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Phase transitions are logged at `debug`, recorded failures at `warn`.
//!
//! - **Listener output (`io/report`, `io/event_log`)**: Product output of a run.
//!   Always produced, unaffected by `RUST_LOG`.
//!
//! Panics raised by node phases are failures the listeners already report, so
//! [`QuietPanics`] keeps them off stderr and logs them at `debug` instead.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=suite_runner=debug cargo run -- run suite.json
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static INSTALL_HOOK: Once = Once::new();

/// While alive, panics on the current thread are logged at `debug` instead of
/// going to the previously installed panic hook.
///
/// Other threads keep the previous hook. Guards nest.
pub struct QuietPanics {
    _private: (),
}

impl QuietPanics {
    pub fn enter() -> Self {
        INSTALL_HOOK.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if QUIET_DEPTH.with(Cell::get) > 0 {
                    debug!(panic = %info, "panic captured");
                } else {
                    previous(info);
                }
            }));
        });
        QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self { _private: () }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
