use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::application::ports::{AudioFormat, SpeechSynthesizer, SynthesisRequest};
use crate::domain::DialogueSegment;

pub const DEFAULT_SYNTHESIS_CONCURRENCY: usize = 5;

/// Fans one synthesis call out per dialogue line under a fixed concurrency
/// bound. Fail-soft: a failed or empty segment yields `None` at its index
/// and never aborts its siblings.
pub struct DialogueSynthesizer {
    speech: Arc<dyn SpeechSynthesizer>,
    semaphore: Arc<Semaphore>,
    format: AudioFormat,
}

impl DialogueSynthesizer {
    pub fn new(speech: Arc<dyn SpeechSynthesizer>, concurrency: usize) -> Self {
        Self {
            speech,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            format: AudioFormat::Mp3,
        }
    }

    /// Returns one entry per input segment, index-aligned regardless of
    /// completion order. Never fails as a whole; callers treat an all-None
    /// result as their hard-failure condition.
    pub async fn synthesize(
        &self,
        dialogue: &[DialogueSegment],
        voice_map: &HashMap<String, String>,
        default_voice: &str,
    ) -> Vec<Option<Vec<u8>>> {
        let futures = dialogue
            .iter()
            .enumerate()
            .map(|(index, segment)| self.synthesize_segment(index, segment, voice_map, default_voice));
        join_all(futures).await
    }

    async fn synthesize_segment(
        &self,
        index: usize,
        segment: &DialogueSegment,
        voice_map: &HashMap<String, String>,
        default_voice: &str,
    ) -> Option<Vec<u8>> {
        if segment.is_silent() {
            tracing::debug!(index, "Empty dialogue line, nothing to synthesize");
            return None;
        }

        let voice = match voice_map.get(&segment.speaker) {
            Some(v) => v.as_str(),
            None => {
                tracing::warn!(
                    index,
                    speaker = %segment.speaker,
                    default_voice,
                    "No voice mapped for speaker, substituting default voice"
                );
                default_voice
            }
        };

        let _permit = self.semaphore.acquire().await.ok()?;

        let request = SynthesisRequest {
            voice: voice.to_string(),
            format: self.format,
            speed: None,
        };

        match self.speech.synthesize(&segment.line, &request).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(
                    index,
                    speaker = %segment.speaker,
                    error = %e,
                    "Segment synthesis failed, skipping segment"
                );
                None
            }
        }
    }
}
