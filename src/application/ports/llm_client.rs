use async_trait::async_trait;

/// Chat-completion collaborator. The prompt engine layers schema-aware
/// templating and parsing on top of this.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        prompt: &str,
        options: &ModelOptions,
    ) -> Result<ChatCompletion, LlmClientError>;
}

#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ModelOptions {
    /// Call-specific options win; unset fields fall back to `defaults`.
    pub fn merged_over(&self, defaults: &ModelOptions) -> ModelOptions {
        ModelOptions {
            model: self.model.clone().or_else(|| defaults.model.clone()),
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
