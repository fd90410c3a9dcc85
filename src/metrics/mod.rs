//! Per-call inference metrics.
//!
//! A sink receives one [`InferenceRecord`] per model call. Recording is
//! infallible from the caller's point of view: a sink that cannot store a
//! record reports it on stderr and drops it.

mod sqlite;

pub use sqlite::{LogRow, SqliteSink, recent_logs};

/// One model call, as stored by a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRecord<'a> {
    pub model: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    pub input_text: &'a str,
    pub output_text: &'a str,
    pub latency_ms: f64,
    pub tokens_per_sec: f64,
    /// No automatic scorer exists yet, so callers pass `None`.
    pub quality_score: Option<f64>,
}

impl InferenceRecord<'_> {
    /// Input length in characters.
    pub fn input_length(&self) -> usize {
        self.input_text.chars().count()
    }

    /// Output length in characters.
    pub fn output_length(&self) -> usize {
        self.output_text.chars().count()
    }
}

pub trait MetricsSink {
    fn record(&mut self, record: &InferenceRecord<'_>);

    /// Flushes and releases any held connection.
    fn close(&mut self) {}
}

impl<S: MetricsSink + ?Sized> MetricsSink for Box<S> {
    fn record(&mut self, record: &InferenceRecord<'_>) {
        (**self).record(record);
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Discards every record (`--no-metrics`).
#[derive(Debug, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _record: &InferenceRecord<'_>) {}
}
