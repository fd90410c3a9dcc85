//! Per-file translation driver.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{ResolvedConfig, TargetLanguage};
use crate::document::{self, SourceDocument};
use crate::frontmatter::{self, FieldError};
use crate::fs::atomic_write;
use crate::metrics::MetricsSink;
use crate::translation::{InferenceClient, PromptRules, Role, Translator};
use crate::ui::Style;

/// What the pipeline needs to know, independent of where it came from.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_lang: String,
    pub targets: Vec<TargetLanguage>,
    pub prompts: PromptRules,
}

impl From<&ResolvedConfig> for PipelineConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            source_lang: config.source_lang.clone(),
            targets: config.targets.clone(),
            prompts: config.prompts.clone(),
        }
    }
}

/// Result of one target language for one file.
#[derive(Debug)]
pub struct LanguageOutcome {
    pub target: String,
    /// Where the translation was written, or why it was not.
    pub result: Result<PathBuf>,
    /// Frontmatter fields that kept their original text.
    pub field_failures: Vec<FieldError>,
}

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcomes: Vec<LanguageOutcome>,
}

impl FileReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failed(&self) -> impl Iterator<Item = &LanguageOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

pub struct Pipeline<C, S> {
    translator: Translator<C, S>,
    source_lang: String,
    targets: Vec<TargetLanguage>,
}

impl<C: InferenceClient, S: MetricsSink> Pipeline<C, S> {
    pub fn new(config: PipelineConfig, client: C, sink: S) -> Self {
        Self {
            translator: Translator::new(client, sink, &config.source_lang, config.prompts),
            source_lang: config.source_lang,
            targets: config.targets,
        }
    }

    pub fn targets(&self) -> &[TargetLanguage] {
        &self.targets
    }

    pub const fn translator(&self) -> &Translator<C, S> {
        &self.translator
    }

    /// Where `source` is written for `target`.
    pub fn output_path(&self, source: &Path, target: &TargetLanguage) -> PathBuf {
        document::output_path(source, &self.source_lang, &target.dir_segment())
    }

    /// Translates one post into every target language.
    ///
    /// Only a failure to read the source is returned as `Err`. Each language
    /// is attempted even when an earlier one failed; per-language errors are
    /// in the report.
    pub async fn process(&mut self, path: &Path) -> Result<FileReport> {
        let source = SourceDocument::read(path)?;

        crate::status!(
            "{} {}",
            Style::header("Processing Post:"),
            Style::value(path.file_name().unwrap_or_default().to_string_lossy())
        );
        if !source.has_frontmatter() {
            crate::warn!(
                "{} No frontmatter detected, translating entire content.",
                Style::warning("[Warning]")
            );
        }

        let mut outcomes = Vec::with_capacity(self.targets.len());
        for target in self.targets.clone() {
            crate::status!("\n--- Starting {} Translation ---", Style::code(&target.code));

            let mut field_failures = Vec::new();
            let result = self
                .translate_into(&source, path, &target, &mut field_failures)
                .await;

            for failure in &field_failures {
                crate::warn!("   {} {failure}", Style::warning("[Warning]"));
            }
            match &result {
                Ok(written) => crate::status!(
                    "{} {}",
                    Style::success("[Saved]"),
                    written.display()
                ),
                Err(e) => crate::warn!(
                    "{} {} translation of {} failed: {e:#}",
                    Style::error("[Error]"),
                    target.code,
                    path.display()
                ),
            }

            outcomes.push(LanguageOutcome {
                target: target.code.clone(),
                result,
                field_failures,
            });
        }

        Ok(FileReport {
            source: path.to_path_buf(),
            outcomes,
        })
    }

    async fn translate_into(
        &mut self,
        source: &SourceDocument,
        path: &Path,
        target: &TargetLanguage,
        field_failures: &mut Vec<FieldError>,
    ) -> Result<PathBuf> {
        let frontmatter = match source.frontmatter.as_deref() {
            Some(block) if !block.trim().is_empty() => {
                let transcoded = frontmatter::transcode(&mut self.translator, block, target).await;
                field_failures.extend(transcoded.failures);
                Some(transcoded.frontmatter)
            }
            other => other.map(ToString::to_string),
        };

        let body = if source.body.text.is_empty() {
            String::new()
        } else {
            self.translator
                .translate(target, Role::Body, &source.body.text)
                .await?
        };

        let content = document::assemble(frontmatter.as_deref(), &source.body.with_text(&body));
        let output = self.output_path(path, target);
        atomic_write(&output, &content)?;

        Ok(output)
    }

    /// Closes the metrics sink. Call once the run is over.
    pub fn close(&mut self) {
        self.translator.close();
    }
}
