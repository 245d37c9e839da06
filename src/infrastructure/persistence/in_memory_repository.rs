use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::application::ports::{PodcastRepository, PodcastUpdate, RepositoryError};
use crate::domain::{
    DialogueSegment, OwnerId, PersonalityId, Podcast, PodcastId, PodcastStatus, SourceReference,
};

/// Hash-map backed gateway with real read-back semantics, so tests can
/// drive the orchestrator and then assert on persisted state.
#[derive(Default)]
pub struct InMemoryPodcastRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    podcasts: HashMap<PodcastId, Podcast>,
    transcripts: HashMap<PodcastId, Vec<DialogueSegment>>,
    tags: HashMap<PodcastId, Vec<String>>,
}

impl InMemoryPodcastRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }
}

#[async_trait::async_trait]
impl PodcastRepository for InMemoryPodcastRepository {
    async fn create_initial(
        &self,
        owner: OwnerId,
        source: &SourceReference,
        host: &PersonalityId,
        cohost: &PersonalityId,
    ) -> Result<Podcast, RepositoryError> {
        let podcast = Podcast::new(owner, source.clone(), host.clone(), cohost.clone());
        self.with_state(|state| {
            state.podcasts.insert(podcast.id, podcast.clone());
            state.transcripts.insert(podcast.id, Vec::new());
        });
        Ok(podcast)
    }

    async fn update_status(
        &self,
        id: PodcastId,
        status: PodcastStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.with_state(|state| match state.podcasts.get_mut(&id) {
            Some(podcast) => {
                podcast.status = status;
                podcast.error_message = error_message.map(String::from);
                podcast.updated_at = Utc::now();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(id.as_uuid().to_string())),
        })
    }

    async fn update_transcript(
        &self,
        id: PodcastId,
        segments: &[DialogueSegment],
    ) -> Result<(), RepositoryError> {
        self.with_state(|state| {
            state.transcripts.insert(id, segments.to_vec());
        });
        Ok(())
    }

    async fn transcript(&self, id: PodcastId) -> Result<Vec<DialogueSegment>, RepositoryError> {
        Ok(self.with_state(|state| state.transcripts.get(&id).cloned().unwrap_or_default()))
    }

    async fn add_tags(&self, id: PodcastId, tags: &[String]) -> Result<(), RepositoryError> {
        self.with_state(|state| {
            state.tags.entry(id).or_default().extend_from_slice(tags);
        });
        Ok(())
    }

    async fn tags(&self, id: PodcastId) -> Result<Vec<String>, RepositoryError> {
        Ok(self.with_state(|state| state.tags.get(&id).cloned().unwrap_or_default()))
    }

    async fn update(
        &self,
        id: PodcastId,
        changes: PodcastUpdate,
    ) -> Result<Podcast, RepositoryError> {
        self.with_state(|state| {
            let podcast = state
                .podcasts
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

            if let Some(title) = changes.title {
                podcast.title = Some(title);
            }
            if let Some(summary) = changes.summary {
                podcast.summary = Some(summary);
            }
            if let Some(audio_reference) = changes.audio_reference {
                podcast.audio_reference = Some(audio_reference);
            }
            if let Some(duration) = changes.duration_seconds {
                podcast.duration_seconds = Some(duration);
            }
            if let Some(status) = changes.status {
                podcast.status = status;
            }
            if let Some(host) = changes.host {
                podcast.host = host;
            }
            if let Some(cohost) = changes.cohost {
                podcast.cohost = cohost;
            }
            if let Some(generated_at) = changes.generated_at {
                podcast.generated_at = Some(generated_at);
            }
            if changes.clear_error {
                podcast.error_message = None;
            }
            if changes.clear_audio {
                podcast.audio_reference = None;
                podcast.duration_seconds = None;
            }
            podcast.updated_at = Utc::now();

            Ok(podcast.clone())
        })
    }

    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, RepositoryError> {
        Ok(self.with_state(|state| state.podcasts.get(&id).cloned()))
    }

    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Podcast>, RepositoryError> {
        Ok(self.with_state(|state| {
            let mut podcasts: Vec<Podcast> = state
                .podcasts
                .values()
                .filter(|p| p.owner_id == owner)
                .cloned()
                .collect();
            podcasts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            podcasts
        }))
    }
}
