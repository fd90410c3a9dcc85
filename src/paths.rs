//! XDG-style path utilities for configuration and metrics storage.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "blogtl";

/// Returns the configuration directory for blogtl.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/blogtl` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/blogtl` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join(APP_DIR),
        |xdg| PathBuf::from(xdg).join(APP_DIR),
    )
}

/// Returns the data directory for blogtl, where the metrics database lives.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/blogtl` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/blogtl` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME").map_or_else(
        |_| home_dir().join(".local").join("share").join(APP_DIR),
        |xdg| PathBuf::from(xdg).join(APP_DIR),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Only `~` on its own or `~/...` is expanded; `~user/...` is left untouched.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolves `path` against the current directory without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
