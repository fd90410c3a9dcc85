//! In-memory test doubles for the inference client and metrics sink.

#![allow(clippy::unwrap_used)]

use anyhow::{Result, anyhow};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::metrics::{InferenceRecord, MetricsSink};
use crate::translation::{Inference, InferenceClient, InferenceRequest};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system_prompt: String,
    pub user_text: String,
}

/// Answers calls from a fixed queue, in order.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new<I, T>(responses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::from_results(responses.into_iter().map(|r| Ok(r.into())))
    }

    pub fn from_results(responses: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails the first call with `message`; later calls fail as unscripted.
    pub fn failing(message: &str) -> Self {
        Self::from_results([Err(message.to_string())])
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl InferenceClient for ScriptedClient {
    async fn infer(&self, request: &InferenceRequest<'_>) -> Result<Inference> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: request.model.to_string(),
            system_prompt: request.system_prompt.to_string(),
            user_text: request.user_text.to_string(),
        });

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(Inference {
                text,
                latency_ms: 10.0,
                tokens_per_sec: 20.0,
            }),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted response left")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub model: String,
    pub source_lang: String,
    pub target_lang: String,
    pub input_text: String,
    pub output_text: String,
    pub quality_score: Option<f64>,
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<StoredRecord>,
    pub closed: bool,
}

impl MetricsSink for MemorySink {
    fn record(&mut self, record: &InferenceRecord<'_>) {
        self.rows.push(StoredRecord {
            model: record.model.to_string(),
            source_lang: record.source_lang.to_string(),
            target_lang: record.target_lang.to_string(),
            input_text: record.input_text.to_string(),
            output_text: record.output_text.to_string(),
            quality_score: record.quality_score,
        });
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
