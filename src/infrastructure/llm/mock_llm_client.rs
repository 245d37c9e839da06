use crate::application::ports::{ChatCompletion, LlmClient, LlmClientError, ModelOptions};

/// Returns a canned reply; for tests and local wiring without an API key.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn chat_completion(
        &self,
        _prompt: &str,
        _options: &ModelOptions,
    ) -> Result<ChatCompletion, LlmClientError> {
        Ok(ChatCompletion {
            content: self.response.clone(),
            usage: None,
        })
    }
}
