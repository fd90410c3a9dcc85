//! Subcommand implementations.

/// Init command handler.
pub mod init;

/// Metrics log listing.
pub mod logs;

/// Target language listing.
pub mod targets;

/// Translation command handler.
pub mod translate;
