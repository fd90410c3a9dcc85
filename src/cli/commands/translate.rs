use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::document;
use crate::metrics::{MetricsSink, NullSink, SqliteSink};
use crate::paths;
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::selector::{Selection, select_files};
use crate::translation::{InferenceClient, OllamaClient};
use crate::ui::Style;

pub struct TranslateOptions {
    pub target: Option<String>,
    pub force: bool,
    pub last: bool,
    pub to: Vec<String>,
    pub endpoint: Option<String>,
    pub db: Option<String>,
    pub no_metrics: bool,
}

impl TranslateOptions {
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            endpoint: self.endpoint.clone(),
            db: self.db.clone(),
            no_metrics: self.no_metrics,
            only_targets: self.to.clone(),
        }
    }

    fn selection(&self) -> Selection {
        if self.last {
            Selection::Latest
        } else {
            Selection::Path {
                target: self
                    .target
                    .as_deref()
                    .map(|t| paths::absolutize(&paths::expand_tilde(t))),
                force: self.force,
            }
        }
    }
}

/// How a translate run went.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    /// Files that could not be read or had at least one language fail.
    pub failed: Vec<PathBuf>,
    pub interrupted: bool,
}

impl RunSummary {
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub async fn run_translate(options: TranslateOptions) -> Result<RunSummary> {
    let file = ConfigManager::new().load_or_default()?;
    let config = resolve_config(&options.resolve_options(), &file)?;

    let sink: Box<dyn MetricsSink> = match &config.metrics_db {
        Some(db) => {
            log::debug!("recording metrics to {}", db.display());
            Box::new(SqliteSink::open(db.clone()))
        }
        None => Box::new(NullSink),
    };
    let client = OllamaClient::new(config.endpoint.clone());
    log::debug!("using Ollama at {}", client.endpoint());
    let mut pipeline = Pipeline::new(PipelineConfig::from(&config), client, sink);

    let summary = run_selected(&mut pipeline, &options.selection(), &config).await;

    pipeline.close();
    crate::status!("\n{} Done.", Style::label("[INFO]"));

    summary
}

async fn run_selected<C: InferenceClient, S: MetricsSink>(
    pipeline: &mut Pipeline<C, S>,
    selection: &Selection,
    config: &ResolvedConfig,
) -> Result<RunSummary> {
    let files = select_files(
        selection,
        &config.source_dir,
        &config.extensions,
        &config.output_dirs,
        |path| is_translated(path, config),
    )?;

    if files.is_empty() {
        crate::status!("{} No files to process.", Style::label("[INFO]"));
        return Ok(RunSummary::default());
    }

    crate::status!(
        "\n{} Starting Processing for {} file(s)...",
        Style::label("[INFO]"),
        files.len()
    );

    let interrupt = watch_interrupt();
    Ok(process_files(pipeline, &files, &interrupt).await)
}

/// Every configured target already has an output next to the source.
fn is_translated(path: &Path, config: &ResolvedConfig) -> bool {
    config.targets.iter().all(|target| {
        document::output_path(path, &config.source_lang, &target.dir_segment()).exists()
    })
}

/// Sets the returned flag on the first Ctrl-C. A second Ctrl-C exits at once.
fn watch_interrupt() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let watcher = Arc::clone(&flag);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            log::warn!("could not listen for Ctrl-C");
            return;
        }
        watcher.store(true, Ordering::SeqCst);
        crate::warn!(
            "\n{} Stopping after the current file (press Ctrl-C again to abort).",
            Style::warning("[Interrupt]")
        );

        if tokio::signal::ctrl_c().await.is_ok() {
            crate::output::flush_stderr();
            std::process::exit(exitcode::TEMPFAIL);
        }
    });

    flag
}

async fn process_files<C: InferenceClient, S: MetricsSink>(
    pipeline: &mut Pipeline<C, S>,
    files: &[PathBuf],
    interrupt: &AtomicBool,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (index, path) in files.iter().enumerate() {
        if interrupt.load(Ordering::SeqCst) {
            crate::status!("{} Stopped by user.", Style::label("[INFO]"));
            summary.interrupted = true;
            break;
        }

        crate::status!(
            "\n{} Processing {}",
            Style::label(format!("[{}/{}]", index + 1, files.len())),
            Style::value(path.file_name().unwrap_or_default().to_string_lossy())
        );

        match pipeline.process(path).await {
            Ok(report) => {
                if !report.is_success() {
                    summary.failed.push(report.source);
                }
            }
            Err(e) => {
                crate::warn!(
                    "{} processing {}: {e:#}",
                    Style::error("[ERROR]"),
                    path.display()
                );
                summary.failed.push(path.clone());
            }
        }
        summary.processed += 1;
    }

    if !summary.failed.is_empty() {
        crate::warn!(
            "\n{} {} of {} file(s) had errors:",
            Style::error("[ERROR]"),
            summary.failed.len(),
            summary.processed
        );
        for path in &summary.failed {
            crate::warn!("  - {}", path.display());
        }
    }

    summary
}
