use anyhow::Result;

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::metrics::recent_logs;
use crate::paths;
use crate::ui::Style;

/// Prints the newest metrics rows to stdout.
pub fn print_logs(limit: usize, db: Option<&str>) -> Result<()> {
    let db_path = match db {
        Some(path) => paths::expand_tilde(path),
        None => {
            let file = ConfigManager::new().load_or_default()?;
            let config = resolve_config(&ResolveOptions::default(), &file)?;
            match config.metrics_db {
                Some(path) => path,
                None => {
                    println!("Metrics are disabled in the config file.");
                    return Ok(());
                }
            }
        }
    };

    let rows = recent_logs(&db_path, limit)?;
    if rows.is_empty() {
        println!("No inference logs in {}", db_path.display());
        return Ok(());
    }

    println!(
        "{}",
        Style::header(format!(
            "{:>5}  {:<19}  {:<12}  {:<7}  {:>6}  {:>6}  {:>9}  {:>7}",
            "id", "time", "model", "lang", "in", "out", "latency", "tok/s"
        ))
    );
    for row in rows {
        println!(
            "{:>5}  {:<19}  {:<12}  {:<7}  {:>6}  {:>6}  {:>7.0}ms  {:>7.1}",
            row.id,
            row.created_at,
            row.model_name,
            format!("{}>{}", row.source_lang, row.target_lang),
            row.input_length,
            row.output_length,
            row.latency_ms,
            row.tokens_per_sec
        );
    }

    Ok(())
}
