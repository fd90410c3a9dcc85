//! # blogtl - Blog Post Translation CLI
//!
//! `blogtl` translates Korean MDX blog posts into English and Japanese with a
//! local Ollama model. Frontmatter keeps its structure: only `title`,
//! `description` and `tags` are translated, everything else is copied as is.
//! Every model call is recorded to a local metrics database.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate every post that is missing a translation
//! blogtl
//!
//! # Translate one post, or only the latest one
//! blogtl ~/blog/src/content/blog/ko/hello.mdx
//! blogtl --last
//!
//! # Retranslate a directory into English only
//! blogtl --force --to en ./posts/ko
//!
//! # Inspect recorded inference metrics
//! blogtl logs -n 10
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/blogtl/config.toml` (see `blogtl init`):
//!
//! ```toml
//! [blogtl]
//! source_dir = "~/hun-bot-blog/src/content/blog/ko"
//! endpoint = "http://localhost:11434"
//!
//! [metrics]
//! enabled = true
//!
//! [[targets]]
//! code = "EN"
//! model = "gemma2:9b"
//! prompt = "..."
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and target languages.
pub mod config;

/// Frontmatter/body splitting and output paths.
pub mod document;

/// Frontmatter parsing and field translation.
pub mod frontmatter;

/// File system utilities.
pub mod fs;

/// Inference metrics recording.
pub mod metrics;

/// Global output configuration (quiet mode, colors, stderr routing).
pub mod output;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Per-file translation into every target language.
pub mod pipeline;

/// Choosing which posts to translate.
pub mod selector;

/// Ollama client, prompts and the translator.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

#[cfg(test)]
mod testing;
