use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{
    DialogueSegment, OwnerId, PersonalityId, Podcast, PodcastId, PodcastStatus, SourceReference,
};

/// Durable store for podcast, transcript and tag records. The orchestrator
/// is the only component that advances `status` through this port.
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    /// Creates the podcast row (status = Processing) and its empty
    /// transcript scope atomically.
    async fn create_initial(
        &self,
        owner: OwnerId,
        source: &SourceReference,
        host: &PersonalityId,
        cohost: &PersonalityId,
    ) -> Result<Podcast, RepositoryError>;

    async fn update_status(
        &self,
        id: PodcastId,
        status: PodcastStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    /// Wholesale overwrite; segment order is preserved.
    async fn update_transcript(
        &self,
        id: PodcastId,
        segments: &[DialogueSegment],
    ) -> Result<(), RepositoryError>;

    async fn transcript(&self, id: PodcastId) -> Result<Vec<DialogueSegment>, RepositoryError>;

    async fn add_tags(&self, id: PodcastId, tags: &[String]) -> Result<(), RepositoryError>;

    async fn tags(&self, id: PodcastId) -> Result<Vec<String>, RepositoryError>;

    async fn update(
        &self,
        id: PodcastId,
        changes: PodcastUpdate,
    ) -> Result<Podcast, RepositoryError>;

    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, RepositoryError>;

    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Podcast>, RepositoryError>;
}

/// Partial update; `None` fields are left untouched. The `clear_*` flags
/// null out columns that `Option` cannot express as "set to null".
#[derive(Debug, Clone, Default)]
pub struct PodcastUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub audio_reference: Option<String>,
    pub duration_seconds: Option<u32>,
    pub status: Option<PodcastStatus>,
    pub host: Option<PersonalityId>,
    pub cohost: Option<PersonalityId>,
    pub generated_at: Option<DateTime<Utc>>,
    pub clear_error: bool,
    pub clear_audio: bool,
}
