use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PersonalityId, PodcastStatus, SourceReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PodcastId(Uuid);

impl PodcastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PodcastId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Durable record of one generated podcast.
///
/// Invariants: `host` != `cohost`; Success implies `audio_reference` and
/// `duration_seconds` are set and `error_message` is None; Failed implies
/// `error_message` is set.
#[derive(Debug, Clone)]
pub struct Podcast {
    pub id: PodcastId,
    pub owner_id: OwnerId,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub status: PodcastStatus,
    pub source: SourceReference,
    pub host: PersonalityId,
    pub cohost: PersonalityId,
    pub audio_reference: Option<String>,
    pub duration_seconds: Option<u32>,
    pub error_message: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Podcast {
    /// A freshly created podcast starts in Processing with no artifact.
    pub fn new(
        owner_id: OwnerId,
        source: SourceReference,
        host: PersonalityId,
        cohost: PersonalityId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PodcastId::new(),
            owner_id,
            title: None,
            summary: None,
            status: PodcastStatus::Processing,
            source,
            host,
            cohost,
            audio_reference: None,
            duration_seconds: None,
            error_message: None,
            generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
