use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use podsmith::application::ports::{SpeechSynthesizer, SynthesisError, SynthesisRequest};
use podsmith::application::services::DialogueSynthesizer;
use podsmith::domain::{DialogueSegment, ProviderId};

/// Records every call and tracks the number of calls in flight at once.
struct RecordingSpeechEngine {
    calls: Mutex<Vec<(String, String)>>,
    fail_on_line: Option<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingSpeechEngine {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on_line: None,
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn failing_on(line: &str) -> Self {
        Self {
            fail_on_line: Some(line.to_string()),
            ..Self::new()
        }
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn recorded(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for RecordingSpeechEngine {
    async fn synthesize(
        &self,
        text: &str,
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, SynthesisError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), request.voice.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on_line.as_deref() == Some(text) {
            return Err(SynthesisError::ApiRequestFailed("synthetic".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }

    fn active_provider(&self) -> ProviderId {
        ProviderId::new("test")
    }
}

fn voice_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(speaker, voice)| (speaker.to_string(), voice.to_string()))
        .collect()
}

#[tokio::test]
async fn given_mixed_outcomes_when_synthesizing_then_result_is_length_matched_and_index_aligned() {
    let engine = Arc::new(RecordingSpeechEngine::failing_on("Hello"));
    let synthesizer = DialogueSynthesizer::new(engine.clone(), 5);

    let dialogue = vec![
        DialogueSegment::new("A", "Hi"),
        DialogueSegment::new("B", "Hello"),
        DialogueSegment::new("A", "Bye"),
    ];
    let voices = voice_map(&[("A", "v1"), ("B", "v2")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "v1").await;

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].as_deref(), Some(b"Hi".as_slice()));
    assert_eq!(result[1], None);
    assert_eq!(result[2].as_deref(), Some(b"Bye".as_slice()));
}

#[tokio::test]
async fn given_empty_lines_when_synthesizing_then_no_collaborator_call_is_made() {
    let engine = Arc::new(RecordingSpeechEngine::new());
    let synthesizer = DialogueSynthesizer::new(engine.clone(), 5);

    let dialogue = vec![
        DialogueSegment::new("A", ""),
        DialogueSegment::new("B", "   "),
    ];
    let voices = voice_map(&[("A", "v1"), ("B", "v2")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "v1").await;

    assert_eq!(result, vec![None, None]);
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn given_unmapped_speaker_when_synthesizing_then_default_voice_is_substituted() {
    let engine = Arc::new(RecordingSpeechEngine::new());
    let synthesizer = DialogueSynthesizer::new(engine.clone(), 5);

    let dialogue = vec![DialogueSegment::new("Stranger", "Who am I?")];
    let voices = voice_map(&[("A", "v1")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "fallback").await;

    assert!(result[0].is_some());
    assert_eq!(
        engine.recorded(),
        vec![("Who am I?".to_string(), "fallback".to_string())]
    );
}

#[tokio::test]
async fn given_mapped_speakers_when_synthesizing_then_each_segment_uses_its_speakers_voice() {
    let engine = Arc::new(RecordingSpeechEngine::new());
    let synthesizer = DialogueSynthesizer::new(engine.clone(), 5);

    let dialogue = vec![
        DialogueSegment::new("A", "Hi"),
        DialogueSegment::new("B", "Hello"),
    ];
    let voices = voice_map(&[("A", "v1"), ("B", "v2")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "v1").await;

    assert_eq!(result.iter().flatten().count(), 2);
    let mut recorded = engine.recorded();
    recorded.sort();
    assert_eq!(
        recorded,
        vec![
            ("Hello".to_string(), "v2".to_string()),
            ("Hi".to_string(), "v1".to_string()),
        ]
    );
}

#[tokio::test]
async fn given_more_segments_than_the_bound_when_synthesizing_then_in_flight_never_exceeds_it() {
    let engine = Arc::new(RecordingSpeechEngine::with_delay(Duration::from_millis(
        20,
    )));
    let synthesizer = DialogueSynthesizer::new(engine.clone(), 3);

    let dialogue: Vec<DialogueSegment> = (0..20)
        .map(|i| DialogueSegment::new("A", format!("line {}", i)))
        .collect();
    let voices = voice_map(&[("A", "v1")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "v1").await;

    assert_eq!(result.len(), 20);
    assert!(result.iter().all(Option::is_some));
    assert!(engine.max_in_flight.load(Ordering::SeqCst) <= 3);
    assert_eq!(engine.call_count(), 20);
}

#[tokio::test]
async fn given_all_failures_when_synthesizing_then_all_entries_are_none_and_no_panic() {
    let engine = Arc::new(RecordingSpeechEngine::failing_on("same"));
    let synthesizer = DialogueSynthesizer::new(engine, 2);

    let dialogue = vec![
        DialogueSegment::new("A", "same"),
        DialogueSegment::new("B", "same"),
    ];
    let voices = voice_map(&[("A", "v1"), ("B", "v2")]);

    let result = synthesizer.synthesize(&dialogue, &voices, "v1").await;

    assert_eq!(result, vec![None, None]);
}
