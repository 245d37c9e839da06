use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{SpeechSynthesizer, SynthesisError, SynthesisRequest};
use crate::domain::ProviderId;

pub const OPENAI_PROVIDER: &str = "openai";

/// OpenAI text-to-speech adapter.
pub struct OpenAiSpeechEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiSpeechEngine {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        let endpoint = format!("{}/v1/audio/speech", base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct SpeechRequestBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechEngine {
    async fn synthesize(
        &self,
        text: &str,
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, SynthesisError> {
        let body = SpeechRequestBody {
            model: &self.model,
            input: text,
            voice: &request.voice,
            response_format: request.format.as_str(),
            speed: request.speed,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            voice = %request.voice,
            chars = text.len(),
            "Sending speech synthesis request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SynthesisError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            if status == reqwest::StatusCode::BAD_REQUEST && body.contains("voice") {
                return Err(SynthesisError::VoiceRejected(body));
            }
            return Err(SynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("read body: {}", e)))?;

        Ok(bytes.to_vec())
    }

    fn active_provider(&self) -> ProviderId {
        ProviderId::new(OPENAI_PROVIDER)
    }
}
