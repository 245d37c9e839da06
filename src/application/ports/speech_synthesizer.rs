use async_trait::async_trait;

use crate::domain::ProviderId;

/// Per-line speech synthesis collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, SynthesisError>;

    /// Identity of the backing provider, used to pick the matching voice
    /// handle from the personality catalog.
    fn active_provider(&self) -> ProviderId;
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub voice: String,
    pub format: AudioFormat,
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("voice rejected: {0}")]
    VoiceRejected(String),
}
