use anyhow::Result;

use super::client::{InferenceClient, InferenceRequest};
use super::prompt::{PromptRules, Role, build_system_prompt, clean_output};
use crate::config::TargetLanguage;
use crate::metrics::{InferenceRecord, MetricsSink};
use crate::ui::Style;

/// Sends one role-tagged piece of a post to the model and logs the call.
///
/// Model and system prompt are picked from the target language and the role
/// alone; every successful call produces exactly one metrics record.
pub struct Translator<C, S> {
    client: C,
    sink: S,
    source_lang: String,
    rules: PromptRules,
}

impl<C: InferenceClient, S: MetricsSink> Translator<C, S> {
    pub fn new(client: C, sink: S, source_lang: &str, rules: PromptRules) -> Self {
        Self {
            client,
            sink,
            source_lang: source_lang.to_uppercase(),
            rules,
        }
    }

    pub async fn translate(
        &mut self,
        target: &TargetLanguage,
        role: Role,
        text: &str,
    ) -> Result<String> {
        let system_prompt = build_system_prompt(&target.prompt, role, &self.rules);

        crate::status!(
            "   {} {} -> {} ({role})...",
            Style::secondary("[Inference]"),
            Style::value(&target.model),
            Style::code(&target.code)
        );

        let request = InferenceRequest {
            model: &target.model,
            system_prompt: &system_prompt,
            user_text: text,
        };
        let inference = self.client.infer(&request).await?;
        let output = clean_output(role, &inference.text);

        self.sink.record(&InferenceRecord {
            model: &target.model,
            source_lang: &self.source_lang,
            target_lang: &target.code,
            input_text: text,
            output_text: &output,
            latency_ms: inference.latency_ms,
            tokens_per_sec: inference.tokens_per_sec,
            quality_score: None,
        });

        Ok(output)
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn close(&mut self) {
        self.sink.close();
    }
}
