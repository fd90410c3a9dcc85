//! Console output for a translation run.
//!
//! Translated posts are written to disk, so the terminal only ever carries
//! progress and problems, both on stderr:
//!
//! - `status!` prints per-file and per-call progress, hidden by `--quiet`
//! - `warn!` prints problems a user must see, even with `--quiet`
//!
//! Colors follow `--no-color` and the `NO_COLOR` environment variable.
//! Developer diagnostics use the `log` facade instead (see `RUST_LOG`).

use std::io::{self, Write};
use std::sync::OnceLock;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputConfig {
    /// Builds the config from CLI flags; `NO_COLOR` (<https://no-color.org/>)
    /// disables colors even without `--no-color`.
    pub fn from_flags(quiet: bool, no_color: bool) -> Self {
        Self {
            quiet,
            no_color: no_color || std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

/// Sets the process-wide output config. Only the first call has an effect.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(|| OutputConfig::from_flags(false, false))
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Prints a progress line to stderr unless `--quiet` is set.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints a problem to stderr regardless of `--quiet`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
    }};
}

/// Flushes stderr before the process exits without unwinding.
pub fn flush_stderr() {
    let _ = io::stderr().flush();
}
