use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::translation::PromptRules;

/// Built-in blog location used when neither the CLI nor the config names one.
pub const DEFAULT_SOURCE_DIR: &str = "~/hun-bot-blog/src/content/blog/ko";
/// Language of the source posts.
pub const DEFAULT_SOURCE_LANG: &str = "ko";
/// Local Ollama endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
/// File extensions considered blog posts.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mdx"];

const EN_PROMPT: &str = "You are a skilled tech blog translator.
Translate the Korean text into natural, professional English for a developer audience.

[Critical Rules]
1. Tone: casual but professional (devlog style). Use \"I\" for the first person.
2. Technical terms: keep terms like 'Local LLM', 'vscode', 'commit & push', 'terminal' in English.
3. Tags: if the input is a list of tags (e.g. ['A', 'B']), translate the words inside but keep the ['...'] format strictly.
4. Formatting: preserve all Markdown formatting.";

const JP_PROMPT: &str = "あなたはプロの技術ブロガーです。韓国語の技術ブログを日本のエンジニア向けに自然な日本語へ翻訳してください。

[Critical Rules]
1. Tone: polite but technical (「です・ます」調).
2. Technical terms: use standard Katakana or English (e.g. Local LLM, vscode).
3. Tags: if the input is a list of tags (e.g. ['A', 'B']), translate the words inside but keep the ['...'] format strictly.
4. Formatting: Markdownの形式を崩さないでください。";

/// General settings in the `[blogtl]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogtlConfig {
    /// Directory scanned when no path is given, and by `--last`.
    pub source_dir: Option<String>,
    /// Language code of the source posts, also the path segment to swap.
    pub source_lang: Option<String>,
    /// Ollama endpoint URL.
    pub endpoint: Option<String>,
    /// File extensions to pick up when scanning directories.
    pub extensions: Option<Vec<String>>,
}

/// Settings in the `[metrics]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether inference calls are logged at all.
    pub enabled: Option<bool>,
    /// `SQLite` database path.
    pub database: Option<String>,
}

/// Optional overrides for the role-specific prompt suffixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    pub tags: Option<String>,
    pub metadata: Option<String>,
}

/// One output language: its code, the model that serves it and its base prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLanguage {
    /// Upper-case language code, e.g. `EN`.
    pub code: String,
    /// Ollama model identifier.
    pub model: String,
    /// Base system prompt for every call in this language.
    pub prompt: String,
}

impl TargetLanguage {
    pub fn new(code: &str, model: &str, prompt: &str) -> Self {
        Self {
            code: code.to_string(),
            model: model.to_string(),
            prompt: prompt.to_string(),
        }
    }

    /// Directory segment for this language's output (`EN` -> `en`).
    pub fn dir_segment(&self) -> String {
        self.code.to_lowercase()
    }
}

/// The built-in English and Japanese targets.
pub fn default_targets() -> Vec<TargetLanguage> {
    vec![
        TargetLanguage::new("EN", "gemma2:9b", EN_PROMPT),
        TargetLanguage::new("JP", "qwen2.5:7b", JP_PROMPT),
    ]
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/blogtl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub blogtl: BlogtlConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    /// Ordered target languages; empty means the built-in pair.
    #[serde(default)]
    pub targets: Vec<TargetLanguage>,
}

impl ConfigFile {
    /// A config file with every default spelled out, written by `blogtl init`.
    pub fn with_defaults() -> Self {
        let rules = PromptRules::default();
        Self {
            blogtl: BlogtlConfig {
                source_dir: Some(DEFAULT_SOURCE_DIR.to_string()),
                source_lang: Some(DEFAULT_SOURCE_LANG.to_string()),
                endpoint: Some(DEFAULT_ENDPOINT.to_string()),
                extensions: Some(DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()),
            },
            metrics: MetricsConfig {
                enabled: Some(true),
                database: None,
            },
            prompts: PromptsConfig {
                tags: Some(rules.tags_instruction),
                metadata: Some(rules.metadata_instruction),
            },
            targets: default_targets(),
        }
    }
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source_dir: PathBuf,
    pub source_lang: String,
    pub endpoint: String,
    pub extensions: Vec<String>,
    /// `None` when metrics are disabled.
    pub metrics_db: Option<PathBuf>,
    pub prompts: PromptRules,
    pub targets: Vec<TargetLanguage>,
    /// Output directory names of every configured target, including those
    /// left out by `--to`. Posts under them are translations, not sources.
    pub output_dirs: Vec<String>,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Endpoint URL override.
    pub endpoint: Option<String>,
    /// Metrics database path override.
    pub db: Option<String>,
    /// Disable metrics regardless of the config file.
    pub no_metrics: bool,
    /// Restrict the run to these target codes (case-insensitive).
    pub only_targets: Vec<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take precedence
/// over built-in defaults.
///
/// # Errors
///
/// Returns an error if a `--to` code names no configured target, or if the
/// configured targets contain a duplicate or empty code.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let blogtl = &config_file.blogtl;

    let source_dir = paths::expand_tilde(blogtl.source_dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR));
    let source_lang = blogtl
        .source_lang
        .clone()
        .unwrap_or_else(|| DEFAULT_SOURCE_LANG.to_string());
    let endpoint = options
        .endpoint
        .as_ref()
        .or(blogtl.endpoint.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let extensions = blogtl.extensions.clone().unwrap_or_else(|| {
        DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
    });

    let metrics_enabled = !options.no_metrics && config_file.metrics.enabled.unwrap_or(true);
    let metrics_db = metrics_enabled.then(|| {
        options
            .db
            .as_ref()
            .or(config_file.metrics.database.as_ref())
            .map_or_else(|| paths::data_dir().join("metrics.db"), |p| paths::expand_tilde(p))
    });

    let defaults = PromptRules::default();
    let prompts = PromptRules {
        tags_instruction: config_file
            .prompts
            .tags
            .clone()
            .unwrap_or(defaults.tags_instruction),
        metadata_instruction: config_file
            .prompts
            .metadata
            .clone()
            .unwrap_or(defaults.metadata_instruction),
    };

    let configured = if config_file.targets.is_empty() {
        default_targets()
    } else {
        config_file.targets.clone()
    };
    validate_targets(&configured)?;
    let output_dirs = configured.iter().map(TargetLanguage::dir_segment).collect();

    let targets = if options.only_targets.is_empty() {
        configured
    } else {
        select_targets(&configured, &options.only_targets)?
    };

    Ok(ResolvedConfig {
        source_dir,
        source_lang,
        endpoint,
        extensions,
        metrics_db,
        prompts,
        targets,
        output_dirs,
    })
}

fn validate_targets(targets: &[TargetLanguage]) -> Result<()> {
    for (index, target) in targets.iter().enumerate() {
        if target.code.trim().is_empty() {
            bail!("Target #{} in config.toml has an empty 'code'", index + 1);
        }
        if targets[..index]
            .iter()
            .any(|t| t.code.eq_ignore_ascii_case(&target.code))
        {
            bail!("Target '{}' is configured more than once", target.code);
        }
    }
    Ok(())
}

fn select_targets(configured: &[TargetLanguage], codes: &[String]) -> Result<Vec<TargetLanguage>> {
    for code in codes {
        if !configured.iter().any(|t| t.code.eq_ignore_ascii_case(code)) {
            let available: Vec<_> = configured.iter().map(|t| t.code.as_str()).collect();
            bail!(
                "Unknown target language: '{code}'\n\n\
                 Configured targets: {}\n\
                 Run 'blogtl targets' to see them.",
                available.join(", ")
            );
        }
    }
    // Keep configuration order, not CLI order
    Ok(configured
        .iter()
        .filter(|t| codes.iter().any(|c| t.code.eq_ignore_ascii_case(c)))
        .cloned()
        .collect())
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/blogtl/config.toml`
    /// or `~/.config/blogtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self {
            config_path: paths::config_dir().join("config.toml"),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, treating a missing file as all defaults.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
