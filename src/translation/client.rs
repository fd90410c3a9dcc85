use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;
use std::time::Instant;

use super::ndjson::ndjson_to_chunks;
use crate::ui::Spinner;

/// One call to the model backend.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_text: &'a str,
}

/// What a call produced, with its timing metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub text: String,
    pub latency_ms: f64,
    pub tokens_per_sec: f64,
}

/// A language-model backend.
///
/// Calls are sequential: the pipeline awaits each one before starting the
/// next, so implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait InferenceClient {
    async fn infer(&self, request: &InferenceRequest<'_>) -> Result<Inference>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
struct UnloadRequest<'a> {
    model: &'a str,
    keep_alive: u32,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    /// No request timeout is set: a long body translation on a slow machine
    /// can legitimately take many minutes.
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Marks `model` as in use for the duration of one call.
    const fn load<'a>(&'a self, model: &'a str) -> LoadedModel<'a> {
        LoadedModel { client: self, model }
    }
}

impl InferenceClient for OllamaClient {
    async fn infer(&self, request: &InferenceRequest<'_>) -> Result<Inference> {
        let lease = self.load(request.model);
        let outcome = lease.chat(request.system_prompt, request.user_text).await;
        lease.release().await;
        outcome
    }
}

/// A model held in backend memory for one inference call.
///
/// `release` must be awaited on every path once the call finishes; it asks
/// Ollama to evict the model right away so that consecutive calls for
/// different languages don't keep two large models resident.
struct LoadedModel<'a> {
    client: &'a OllamaClient,
    model: &'a str,
}

impl LoadedModel<'_> {
    async fn chat(&self, system_prompt: &str, user_text: &str) -> Result<Inference> {
        let url = format!("{}/api/chat", self.client.endpoint);

        let chat_request = ChatRequest {
            model: self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(system_prompt),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(user_text),
                },
            ],
            stream: true,
        };

        log::debug!(
            "POST {url} model={} input_chars={}",
            self.model,
            user_text.chars().count()
        );
        let started = Instant::now();

        let response = self
            .client
            .client
            .post(&url)
            .json(&chat_request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to Ollama at {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama request failed with status {status}: {body}");
        }

        let spinner = Spinner::new(self.model);
        let mut stream = std::pin::pin!(ndjson_to_chunks(response.bytes_stream()));
        let mut text = String::new();
        let mut tokens_per_sec = 0.0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            text.push_str(chunk.content());
            spinner.received(text.chars().count());
            if chunk.done {
                tokens_per_sec = chunk.tokens_per_sec();
                break;
            }
        }
        spinner.stop();

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "{} finished in {latency_ms:.0}ms ({tokens_per_sec:.1} tok/s)",
            self.model
        );

        Ok(Inference {
            text,
            latency_ms,
            tokens_per_sec,
        })
    }

    async fn release(self) {
        let url = format!("{}/api/generate", self.client.endpoint);
        let request = UnloadRequest {
            model: self.model,
            keep_alive: 0,
        };

        let result = self.client.client.post(&url).json(&request).send().await;
        match result {
            Ok(response) if response.status().is_success() => {
                log::debug!("unloaded {}", self.model);
            }
            Ok(response) => {
                log::warn!("unloading {} returned status {}", self.model, response.status());
            }
            Err(e) => log::warn!("unloading {} failed: {e}", self.model),
        }
    }
}
