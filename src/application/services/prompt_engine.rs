use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::application::ports::{LlmClient, ModelOptions};
use crate::application::prompts::{FieldError, PromptDefinition, format_field_errors, validate_params};

/// Heuristic match for a reply wrapped in a single fenced code block, with
/// or without a language tag. Not a markdown parser: only one outer fence
/// is peeled, and backticks inside the payload are left alone.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```\z").unwrap()
});

const PARSE_SNIPPET_CHARS: usize = 120;

/// Executes structured prompts: validates parameters, renders the template
/// (plus output-schema instructions), calls the language model, strips
/// code fencing, parses JSON and validates it against the output schema.
///
/// `run` returns either a structured value or a classified error, never
/// both; no failure crosses this boundary as a panic.
pub struct PromptEngine {
    llm: Arc<dyn LlmClient>,
}

impl PromptEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        definition: &PromptDefinition,
        params: &Map<String, Value>,
        options: Option<&ModelOptions>,
    ) -> Result<Value, PromptEngineError> {
        let field_errors = validate_params(definition.parameters, params);
        if !field_errors.is_empty() {
            return Err(PromptEngineError::InputValidation {
                fields: field_errors,
            });
        }

        let mut prompt = (definition.render)(params);
        if let Some(schema) = &definition.output_schema {
            prompt.push_str("\n\n");
            prompt.push_str(&schema.instruction());
        }

        let merged = match options {
            Some(call_options) => call_options.merged_over(&definition.defaults),
            None => definition.defaults.clone(),
        };

        tracing::debug!(
            prompt = definition.name,
            prompt_chars = prompt.len(),
            "Executing structured prompt"
        );

        let completion = self
            .llm
            .chat_completion(&prompt, &merged)
            .await
            .map_err(|e| PromptEngineError::Model(e.to_string()))?;

        let raw = completion.content.trim();
        if raw.is_empty() {
            return Err(PromptEngineError::Model(
                "model returned empty content".to_string(),
            ));
        }

        let cleaned = strip_code_fence(raw);
        let value: Value =
            serde_json::from_str(cleaned).map_err(|e| PromptEngineError::Parse {
                reason: e.to_string(),
                snippet: snippet_of(cleaned),
            })?;

        if let Some(schema) = &definition.output_schema {
            let schema_errors = schema.validate(&value);
            if !schema_errors.is_empty() {
                return Err(PromptEngineError::OutputValidation {
                    fields: schema_errors,
                });
            }
        }

        if let Some(usage) = completion.usage {
            tracing::debug!(
                prompt = definition.name,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Structured prompt completed"
            );
        }

        Ok(value)
    }
}

/// Strips one wrapping fence; anything that doesn't look like a fenced
/// block is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text) {
        Some(captures) => captures
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or(text),
        None => text,
    }
}

fn snippet_of(text: &str) -> String {
    let mut snippet: String = text.chars().take(PARSE_SNIPPET_CHARS).collect();
    if text.chars().count() > PARSE_SNIPPET_CHARS {
        snippet.push_str("...");
    }
    snippet
}

#[derive(Debug, thiserror::Error)]
pub enum PromptEngineError {
    #[error("input validation failed: {}", format_field_errors(.fields))]
    InputValidation { fields: Vec<FieldError> },
    #[error("model call failed: {0}")]
    Model(String),
    #[error("output parse failed: {reason}; near: {snippet}")]
    Parse { reason: String, snippet: String },
    #[error("output validation failed: {}", format_field_errors(.fields))]
    OutputValidation { fields: Vec<FieldError> },
}
