use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value, json};
use tokio::task::JoinHandle;

use super::{AssemblyError, AudioAssembler, DialogueSynthesizer, PromptEngine, PromptEngineError};
use crate::application::ports::{
    ContentFetchError, ContentFetcher, PodcastRepository, PodcastUpdate, RepositoryError,
    SpeechSynthesizer,
};
use crate::application::prompts::{ScriptOutput, podcast_script_prompt};
use crate::application::voices::{VoiceCatalog, VoiceLookupError};
use crate::domain::{
    DialogueSegment, OwnerId, Personality, PersonalityId, Podcast, PodcastId, PodcastStatus,
    SourceReference,
};

/// Everything the orchestrator talks to, wired in one place at construction.
#[derive(Clone)]
pub struct GenerationDependencies {
    pub repository: Arc<dyn PodcastRepository>,
    pub content_fetcher: Arc<dyn ContentFetcher>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub prompt_engine: Arc<PromptEngine>,
    pub synthesizer: Arc<DialogueSynthesizer>,
    pub assembler: Arc<AudioAssembler>,
    pub voices: Arc<VoiceCatalog>,
}

/// Composes fetch, script generation, synthesis and assembly into one
/// pipeline, and owns the persisted Processing -> Success | Failed state
/// machine. Pipelines run as detached tasks; any stage failure is caught
/// once per entry point and written back as the record's failed state.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    deps: GenerationDependencies,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("host and cohost must be different personalities")]
    InvalidCast,
    #[error("voice resolution failed: {0}")]
    Voice(#[from] VoiceLookupError),
    #[error("content fetch failed: {0}")]
    Fetch(#[from] ContentFetchError),
    #[error("script generation failed: {0}")]
    Script(#[from] PromptEngineError),
    #[error("script decode failed: {0}")]
    ScriptDecode(String),
    #[error("no dialogue segment could be synthesized")]
    NoAudibleSegments,
    #[error("audio assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("persistence failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// What an edit request resolved to.
pub enum EditOutcome {
    /// Metadata-only change, written through directly.
    Updated(Podcast),
    /// Dialogue or voices changed; a regeneration task was spawned.
    RegenerationStarted(Podcast),
}

struct ResolvedCast {
    host: Personality,
    host_voice: String,
    cohost: Personality,
    cohost_voice: String,
}

impl GenerationOrchestrator {
    pub fn new(deps: GenerationDependencies) -> Self {
        Self { deps }
    }

    /// Durably creates the initial Processing record, then detaches the
    /// rest of the pipeline. Returns as soon as the record exists; the
    /// outcome becomes visible only through the persisted status.
    pub async fn start_generation(
        &self,
        owner: OwnerId,
        source: SourceReference,
        host: PersonalityId,
        cohost: PersonalityId,
    ) -> Result<Podcast, GenerationError> {
        if host == cohost {
            return Err(GenerationError::InvalidCast);
        }

        let podcast = self
            .deps
            .repository
            .create_initial(owner, &source, &host, &cohost)
            .await?;

        self.spawn_generate(podcast.id, source, host, cohost);
        Ok(podcast)
    }

    /// Runs the full pipeline detached. Task failure is routed through the
    /// same record-failure path as in-pipeline errors.
    pub fn spawn_generate(
        &self,
        id: PodcastId,
        source: SourceReference,
        host: PersonalityId,
        cohost: PersonalityId,
    ) -> JoinHandle<()> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = orchestrator.generate(id, &source, &host, &cohost).await {
                orchestrator.record_failure(id, &e).await;
            }
        })
    }

    pub fn spawn_regenerate(
        &self,
        id: PodcastId,
        dialogue: Vec<DialogueSegment>,
        host: PersonalityId,
        cohost: PersonalityId,
        title: Option<String>,
    ) -> JoinHandle<()> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = orchestrator
                .regenerate(id, &dialogue, &host, &cohost, title)
                .await
            {
                orchestrator.record_failure(id, &e).await;
            }
        })
    }

    /// The primary pipeline: fetch -> script -> persist transcript/tags ->
    /// synthesize -> assemble -> finalize.
    pub async fn generate(
        &self,
        id: PodcastId,
        source: &SourceReference,
        host_id: &PersonalityId,
        cohost_id: &PersonalityId,
    ) -> Result<(), GenerationError> {
        tracing::info!(
            podcast_id = %id.as_uuid(),
            source = %source,
            host = %host_id,
            cohost = %cohost_id,
            "Starting podcast generation"
        );

        let cast = self.resolve_cast(host_id, cohost_id)?;

        let content = self.deps.content_fetcher.fetch(source).await?;

        let script = self.generate_script(&content, &cast).await?;
        self.deps
            .repository
            .update_transcript(id, &script.dialogue)
            .await?;
        self.deps.repository.add_tags(id, &script.tags).await?;

        let (artifact, duration) = self.produce_audio(id, &script.dialogue, &cast).await?;

        self.deps
            .repository
            .update(
                id,
                PodcastUpdate {
                    title: Some(script.title),
                    summary: Some(script.summary),
                    audio_reference: Some(artifact),
                    duration_seconds: Some(duration),
                    status: Some(PodcastStatus::Success),
                    generated_at: Some(Utc::now()),
                    clear_error: true,
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(
            podcast_id = %id.as_uuid(),
            duration_seconds = duration,
            "Podcast generation completed"
        );
        Ok(())
    }

    /// The regeneration variant: synthesis and assembly over an already
    /// edited dialogue, no re-fetch and no new script.
    pub async fn regenerate(
        &self,
        id: PodcastId,
        dialogue: &[DialogueSegment],
        host_id: &PersonalityId,
        cohost_id: &PersonalityId,
        title: Option<String>,
    ) -> Result<(), GenerationError> {
        tracing::info!(
            podcast_id = %id.as_uuid(),
            segments = dialogue.len(),
            "Starting podcast regeneration"
        );

        let cast = self.resolve_cast(host_id, cohost_id)?;
        let (artifact, duration) = self.produce_audio(id, dialogue, &cast).await?;

        self.deps
            .repository
            .update(
                id,
                PodcastUpdate {
                    title,
                    audio_reference: Some(artifact),
                    duration_seconds: Some(duration),
                    status: Some(PodcastStatus::Success),
                    generated_at: Some(Utc::now()),
                    clear_error: true,
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(podcast_id = %id.as_uuid(), "Podcast regeneration completed");
        Ok(())
    }

    /// Applies a user edit. Dialogue or voice changes re-enter the pipeline
    /// (transcript overwritten wholesale, status reset to Processing, stale
    /// artifact cleared); metadata-only edits are written through as-is.
    pub async fn apply_edit(
        &self,
        id: PodcastId,
        edit: PodcastEdit,
    ) -> Result<EditOutcome, GenerationError> {
        let podcast = self
            .deps
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

        let host = edit.host.unwrap_or_else(|| podcast.host.clone());
        let cohost = edit.cohost.unwrap_or_else(|| podcast.cohost.clone());
        if host == cohost {
            return Err(GenerationError::InvalidCast);
        }

        let current_dialogue = self.deps.repository.transcript(id).await?;
        let dialogue_changed = edit
            .dialogue
            .as_ref()
            .map(|d| *d != current_dialogue)
            .unwrap_or(false);
        let voices_changed = host != podcast.host || cohost != podcast.cohost;

        if !dialogue_changed && !voices_changed {
            let updated = self
                .deps
                .repository
                .update(
                    id,
                    PodcastUpdate {
                        title: edit.title,
                        status: Some(PodcastStatus::Success),
                        clear_error: true,
                        ..Default::default()
                    },
                )
                .await?;
            return Ok(EditOutcome::Updated(updated));
        }

        let dialogue = edit.dialogue.unwrap_or(current_dialogue);
        self.deps.repository.update_transcript(id, &dialogue).await?;
        let updated = self
            .deps
            .repository
            .update(
                id,
                PodcastUpdate {
                    status: Some(PodcastStatus::Processing),
                    host: Some(host.clone()),
                    cohost: Some(cohost.clone()),
                    clear_audio: true,
                    clear_error: true,
                    ..Default::default()
                },
            )
            .await?;

        self.spawn_regenerate(id, dialogue, host, cohost, edit.title);
        Ok(EditOutcome::RegenerationStarted(updated))
    }

    fn resolve_cast(
        &self,
        host_id: &PersonalityId,
        cohost_id: &PersonalityId,
    ) -> Result<ResolvedCast, GenerationError> {
        let provider = self.deps.speech.active_provider();
        let host = self
            .deps
            .voices
            .personality(host_id)
            .cloned()
            .ok_or_else(|| VoiceLookupError::UnknownPersonality(host_id.clone()))?;
        let cohost = self
            .deps
            .voices
            .personality(cohost_id)
            .cloned()
            .ok_or_else(|| VoiceLookupError::UnknownPersonality(cohost_id.clone()))?;
        let host_voice = self.deps.voices.voice_handle(&provider, host_id)?;
        let cohost_voice = self.deps.voices.voice_handle(&provider, cohost_id)?;
        Ok(ResolvedCast {
            host,
            host_voice,
            cohost,
            cohost_voice,
        })
    }

    async fn generate_script(
        &self,
        content: &str,
        cast: &ResolvedCast,
    ) -> Result<ScriptOutput, GenerationError> {
        let definition = podcast_script_prompt();
        let mut params = Map::new();
        params.insert("content".to_string(), json!(content));
        params.insert("host_name".to_string(), json!(cast.host.name));
        params.insert(
            "host_description".to_string(),
            json!(cast.host.description),
        );
        params.insert("cohost_name".to_string(), json!(cast.cohost.name));
        params.insert(
            "cohost_description".to_string(),
            json!(cast.cohost.description),
        );

        let value: Value = self
            .deps
            .prompt_engine
            .run(&definition, &params, None)
            .await?;
        serde_json::from_value(value).map_err(|e| GenerationError::ScriptDecode(e.to_string()))
    }

    async fn produce_audio(
        &self,
        id: PodcastId,
        dialogue: &[DialogueSegment],
        cast: &ResolvedCast,
    ) -> Result<(String, u32), GenerationError> {
        let mut voice_map = HashMap::new();
        voice_map.insert(cast.host.name.clone(), cast.host_voice.clone());
        voice_map.insert(cast.cohost.name.clone(), cast.cohost_voice.clone());

        let buffers = self
            .deps
            .synthesizer
            .synthesize(dialogue, &voice_map, &cast.host_voice)
            .await;

        let synthesized = buffers.iter().filter(|b| b.is_some()).count();
        if synthesized == 0 {
            return Err(GenerationError::NoAudibleSegments);
        }
        if synthesized < dialogue.len() {
            tracing::warn!(
                podcast_id = %id.as_uuid(),
                total = dialogue.len(),
                synthesized,
                "Some dialogue segments failed synthesis, continuing with partial audio"
            );
        }

        let merged = self.deps.assembler.stitch(&buffers, id).await?;
        let duration = self.deps.assembler.duration(&merged).await;
        let artifact = self.deps.assembler.encode(&merged);
        Ok((artifact, duration))
    }

    /// The single failure path: one formatted message, written as the
    /// record's failed state. A failure of that write is unrecoverable and
    /// only logged, since no further state-repair mechanism exists.
    async fn record_failure(&self, id: PodcastId, error: &GenerationError) {
        let message = error.to_string();
        tracing::error!(
            podcast_id = %id.as_uuid(),
            error = %message,
            "Podcast pipeline failed"
        );
        if let Err(write_err) = self
            .deps
            .repository
            .update_status(id, PodcastStatus::Failed, Some(&message))
            .await
        {
            tracing::error!(
                podcast_id = %id.as_uuid(),
                error = %write_err,
                "Failed to record pipeline failure; status row is now stale"
            );
        }
    }
}

/// A user edit to an existing podcast.
#[derive(Debug, Clone, Default)]
pub struct PodcastEdit {
    pub title: Option<String>,
    pub dialogue: Option<Vec<DialogueSegment>>,
    pub host: Option<PersonalityId>,
    pub cohost: Option<PersonalityId>,
}
