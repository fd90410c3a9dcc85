//! Newline-delimited JSON parser for Ollama's streaming chat responses.
//!
//! Each line of a streamed `/api/chat` response is one JSON object. Content
//! chunks carry `message.content`; the last one has `done: true` and the
//! generation counters.

use anyhow::{Result, bail};
use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

/// One decoded line of the stream.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: bool,
    /// Number of generated tokens (final chunk only).
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation time in nanoseconds (final chunk only).
    #[serde(default)]
    pub eval_duration: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ChunkMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatChunk {
    pub fn content(&self) -> &str {
        self.message.as_ref().map_or("", |m| m.content.as_str())
    }

    /// Tokens per second from the final chunk's counters, 0 when unknown.
    pub fn tokens_per_sec(&self) -> f64 {
        match (self.eval_count, self.eval_duration) {
            (Some(count), Some(duration)) if duration > 0 => {
                count as f64 / (duration as f64 / 1e9)
            }
            _ => 0.0,
        }
    }
}

/// Converts a raw NDJSON byte stream into a stream of decoded chunks.
///
/// Handles buffering across network chunk boundaries. A line carrying an
/// `error` field ends the stream with that error.
pub fn ndjson_to_chunks(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<ChatChunk>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        // Raw bytes: a multi-byte character may straddle two network chunks
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {e}"));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                match parse_chat_line(String::from_utf8_lossy(&line).trim()) {
                    Ok(Some(parsed)) => yield Ok(parsed),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        // The last object may arrive without a trailing newline
        match parse_chat_line(String::from_utf8_lossy(&buffer).trim()) {
            Ok(Some(parsed)) => yield Ok(parsed),
            Ok(None) => {}
            Err(e) => yield Err(e),
        }
    }
}

/// Parses a single NDJSON line.
///
/// # Returns
///
/// * `Ok(Some(chunk))` - a decoded chunk
/// * `Ok(None)` - blank lines and lines that are not valid JSON
/// * `Err(_)` - the backend reported an error
pub fn parse_chat_line(line: &str) -> Result<Option<ChatChunk>> {
    if line.is_empty() {
        return Ok(None);
    }

    let chunk = match serde_json::from_str::<ChatChunk>(line) {
        Ok(chunk) => chunk,
        Err(e) => {
            log::debug!("skipping undecodable stream line ({e}): {line}");
            return Ok(None);
        }
    };

    if let Some(message) = &chunk.error {
        bail!("Ollama returned an error: {message}");
    }

    Ok(Some(chunk))
}
