mod client;
mod ndjson;
mod prompt;
mod translator;

pub use client::{Inference, InferenceClient, InferenceRequest, OllamaClient};
pub use prompt::{METADATA_INSTRUCTION, PromptRules, Role, TAGS_INSTRUCTION, build_system_prompt, clean_output};
pub use translator::Translator;
