#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! These tests verify that CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file settings
//! 3. Built-in defaults

use std::path::PathBuf;

use blogtl_cli::config::{
    BlogtlConfig, ConfigFile, DEFAULT_ENDPOINT, MetricsConfig, ResolveOptions, TargetLanguage,
    resolve_config,
};

fn make_config_with_settings() -> ConfigFile {
    ConfigFile {
        blogtl: BlogtlConfig {
            source_dir: Some("/srv/blog/ko".to_string()),
            source_lang: Some("ko".to_string()),
            endpoint: Some("http://config.local:11434".to_string()),
            extensions: Some(vec!["mdx".to_string(), "md".to_string()]),
        },
        metrics: MetricsConfig {
            enabled: Some(true),
            database: Some("/var/lib/blogtl/config.db".to_string()),
        },
        targets: vec![
            TargetLanguage::new("EN", "config-en-model", "Translate to English."),
            TargetLanguage::new("JP", "config-jp-model", "日本語に翻訳してください。"),
            TargetLanguage::new("ZH", "config-zh-model", "翻译成中文。"),
        ],
        ..ConfigFile::default()
    }
}

#[test]
fn test_cli_endpoint_overrides_config_endpoint() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        endpoint: Some("http://cli.local:11434".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.endpoint, "http://cli.local:11434");
}

#[test]
fn test_config_endpoint_used_when_cli_not_specified() {
    let config = make_config_with_settings();

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.endpoint, "http://config.local:11434");
    assert_eq!(resolved.source_dir, PathBuf::from("/srv/blog/ko"));
    assert_eq!(resolved.extensions, ["mdx", "md"]);
}

#[test]
fn test_builtin_defaults_used_for_empty_config() {
    let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

    assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(resolved.source_lang, "ko");
    let models: Vec<_> = resolved.targets.iter().map(|t| t.model.as_str()).collect();
    assert_eq!(models, ["gemma2:9b", "qwen2.5:7b"]);
}

#[test]
fn test_cli_db_overrides_config_database() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        db: Some("/tmp/cli.db".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.metrics_db, Some(PathBuf::from("/tmp/cli.db")));
}

#[test]
fn test_cli_no_metrics_overrides_everything() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        db: Some("/tmp/cli.db".to_string()),
        no_metrics: true,
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert!(resolved.metrics_db.is_none());
}

#[test]
fn test_cli_to_restricts_configured_targets() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        only_targets: vec!["zh".to_string(), "EN".to_string()],
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    let codes: Vec<_> = resolved.targets.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, ["EN", "ZH"]);
}

#[test]
fn test_cli_to_unknown_code_returns_error() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        only_targets: vec!["fr".to_string()],
        ..ResolveOptions::default()
    };

    let err = resolve_config(&options, &config).unwrap_err();

    assert!(err.to_string().contains("Unknown target language: 'fr'"));
}

#[test]
fn test_all_cli_options_override_config() {
    let config = make_config_with_settings();
    let options = ResolveOptions {
        endpoint: Some("http://cli.local".to_string()),
        db: Some("/tmp/all.db".to_string()),
        no_metrics: false,
        only_targets: vec!["jp".to_string()],
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.endpoint, "http://cli.local");
    assert_eq!(resolved.metrics_db, Some(PathBuf::from("/tmp/all.db")));
    assert_eq!(resolved.targets.len(), 1);
    assert_eq!(resolved.targets[0].model, "config-jp-model");
}
