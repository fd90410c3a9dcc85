use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};

use super::{InferenceRecord, MetricsSink};
use crate::ui::Style;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS translation_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model_name TEXT NOT NULL,
    source_lang TEXT NOT NULL,
    target_lang TEXT NOT NULL,
    input_length INTEGER NOT NULL,
    output_length INTEGER NOT NULL,
    latency_ms REAL NOT NULL,
    tokens_per_sec REAL NOT NULL,
    similarity_score REAL,
    input_text TEXT NOT NULL,
    output_text TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Metrics sink backed by a local `SQLite` database.
///
/// The connection is opened eagerly, but a failure there is only reported:
/// the next `record` call tries again, and so on until one succeeds.
pub struct SqliteSink {
    db_path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteSink {
    pub fn open(db_path: PathBuf) -> Self {
        let mut sink = Self {
            db_path,
            conn: None,
        };
        sink.conn = sink.try_connect();
        sink
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub const fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn try_connect(&self) -> Option<Connection> {
        match self.connect() {
            Ok(conn) => Some(conn),
            Err(e) => {
                crate::warn!(
                    "{} Metrics database unavailable: {e:#}",
                    Style::warning("[Monitor]")
                );
                None
            }
        }
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create metrics directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(&self.db_path).with_context(|| {
            format!("Failed to open metrics database: {}", self.db_path.display())
        })?;
        conn.execute(CREATE_TABLE, [])
            .context("Failed to create translation_logs table")?;

        Ok(conn)
    }
}

fn insert(conn: &Connection, record: &InferenceRecord<'_>) -> Result<()> {
    conn.execute(
        "INSERT INTO translation_logs
         (model_name, source_lang, target_lang, input_length, output_length,
          latency_ms, tokens_per_sec, similarity_score, input_text, output_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.model,
            record.source_lang,
            record.target_lang,
            record.input_length() as i64,
            record.output_length() as i64,
            record.latency_ms,
            record.tokens_per_sec,
            record.quality_score,
            record.input_text,
            record.output_text,
        ],
    )
    .context("Failed to insert inference log")?;
    Ok(())
}

impl MetricsSink for SqliteSink {
    fn record(&mut self, record: &InferenceRecord<'_>) {
        if self.conn.is_none() {
            self.conn = self.try_connect();
        }
        let Some(conn) = self.conn.as_ref() else {
            return;
        };

        match insert(conn, record) {
            Ok(()) => crate::status!(
                "   {} Saved: {} | {:.2}ms | {:.2} TPS",
                Style::secondary("[DB Log]"),
                record.model,
                record.latency_ms,
                record.tokens_per_sec
            ),
            Err(e) => {
                crate::warn!("{} {e:#}", Style::warning("[Monitor]"));
                // Reconnect on the next record rather than reusing a connection in an unknown state
                self.conn = None;
            }
        }
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take()
            && let Err((_, e)) = conn.close()
        {
            crate::warn!(
                "{} Failed to close metrics database: {e}",
                Style::warning("[Monitor]")
            );
        }
    }
}

/// A stored inference log, as shown by `blogtl logs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub id: i64,
    pub created_at: String,
    pub model_name: String,
    pub source_lang: String,
    pub target_lang: String,
    pub input_length: i64,
    pub output_length: i64,
    pub latency_ms: f64,
    pub tokens_per_sec: f64,
    pub similarity_score: Option<f64>,
}

/// Reads the newest `limit` rows, newest first. A missing database has no rows.
pub fn recent_logs(db_path: &Path, limit: usize) -> Result<Vec<LogRow>> {
    if !db_path.exists() {
        return Ok(Vec::new());
    }

    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open metrics database: {}", db_path.display()))?;

    let mut stmt = conn
        .prepare(
            "SELECT id, created_at, model_name, source_lang, target_lang, input_length,
                    output_length, latency_ms, tokens_per_sec, similarity_score
             FROM translation_logs ORDER BY id DESC LIMIT ?1",
        )
        .context("Failed to query translation_logs")?;

    let rows = stmt
        .query_map([i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
            Ok(LogRow {
                id: row.get(0)?,
                created_at: row.get(1)?,
                model_name: row.get(2)?,
                source_lang: row.get(3)?,
                target_lang: row.get(4)?,
                input_length: row.get(5)?,
                output_length: row.get(6)?,
                latency_ms: row.get(7)?,
                tokens_per_sec: row.get(8)?,
                similarity_score: row.get(9)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
