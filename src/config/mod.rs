//! Configuration file management, target languages and CLI overrides.

mod manager;

pub use manager::{
    BlogtlConfig, ConfigFile, ConfigManager, DEFAULT_ENDPOINT, DEFAULT_EXTENSIONS,
    DEFAULT_SOURCE_DIR, DEFAULT_SOURCE_LANG, MetricsConfig, PromptsConfig, ResolveOptions,
    ResolvedConfig, TargetLanguage, default_targets, resolve_config,
};
