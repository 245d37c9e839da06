use crate::application::ports::{SpeechSynthesizer, SynthesisError, SynthesisRequest};
use crate::domain::ProviderId;

/// Echoes the line text back as "audio" bytes; for tests and local wiring.
pub struct MockSpeechEngine {
    provider: ProviderId,
}

impl MockSpeechEngine {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: ProviderId::new(provider),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSpeechEngine {
    async fn synthesize(
        &self,
        text: &str,
        _request: &SynthesisRequest,
    ) -> Result<Vec<u8>, SynthesisError> {
        Ok(text.as_bytes().to_vec())
    }

    fn active_provider(&self) -> ProviderId {
        self.provider.clone()
    }
}
