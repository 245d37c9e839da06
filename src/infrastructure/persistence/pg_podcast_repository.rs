use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use crate::application::ports::{PodcastRepository, PodcastUpdate, RepositoryError};
use crate::domain::{
    DialogueSegment, OwnerId, PersonalityId, Podcast, PodcastId, PodcastStatus, SourceKind,
    SourceReference,
};

const PODCAST_COLUMNS: &str = "id, owner_id, title, summary, status, source_kind, source_value, \
     host_personality, cohost_personality, audio_reference, duration_seconds, error_message, \
     generated_at, created_at, updated_at";

pub struct PgPodcastRepository {
    pool: PgPool,
}

impl PgPodcastRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn read_podcast(row: &PgRow) -> Result<Podcast, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_failed)?;
    let status = status
        .parse::<PodcastStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    let source_kind: String = row.try_get("source_kind").map_err(query_failed)?;
    let source_kind = source_kind
        .parse::<SourceKind>()
        .map_err(RepositoryError::QueryFailed)?;

    let host: String = row.try_get("host_personality").map_err(query_failed)?;
    let cohost: String = row.try_get("cohost_personality").map_err(query_failed)?;
    let duration: Option<i32> = row.try_get("duration_seconds").map_err(query_failed)?;

    Ok(Podcast {
        id: PodcastId::from_uuid(row.try_get("id").map_err(query_failed)?),
        owner_id: OwnerId::from_uuid(row.try_get("owner_id").map_err(query_failed)?),
        title: row.try_get("title").map_err(query_failed)?,
        summary: row.try_get("summary").map_err(query_failed)?,
        status,
        source: SourceReference {
            kind: source_kind,
            value: row.try_get("source_value").map_err(query_failed)?,
        },
        host: PersonalityId::new(host),
        cohost: PersonalityId::new(cohost),
        audio_reference: row.try_get("audio_reference").map_err(query_failed)?,
        duration_seconds: duration.map(|d| d.max(0) as u32),
        error_message: row.try_get("error_message").map_err(query_failed)?,
        generated_at: row.try_get("generated_at").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl PodcastRepository for PgPodcastRepository {
    #[instrument(skip(self, source), fields(owner_id = %owner.as_uuid()))]
    async fn create_initial(
        &self,
        owner: OwnerId,
        source: &SourceReference,
        host: &PersonalityId,
        cohost: &PersonalityId,
    ) -> Result<Podcast, RepositoryError> {
        let podcast = Podcast::new(owner, source.clone(), host.clone(), cohost.clone());

        let mut tx = self.pool.begin().await.map_err(query_failed)?;
        sqlx::query(
            "INSERT INTO podcasts (id, owner_id, status, source_kind, source_value, \
             host_personality, cohost_personality, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(podcast.id.as_uuid())
        .bind(podcast.owner_id.as_uuid())
        .bind(podcast.status.as_str())
        .bind(podcast.source.kind.as_str())
        .bind(&podcast.source.value)
        .bind(podcast.host.as_str())
        .bind(podcast.cohost.as_str())
        .bind(podcast.created_at)
        .bind(podcast.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(query_failed)?;
        tx.commit().await.map_err(query_failed)?;

        Ok(podcast)
    }

    #[instrument(skip(self, error_message), fields(podcast_id = %id.as_uuid(), status = %status))]
    async fn update_status(
        &self,
        id: PodcastId,
        status: PodcastStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE podcasts SET status = $1, error_message = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(status.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self, segments), fields(podcast_id = %id.as_uuid(), segments = segments.len()))]
    async fn update_transcript(
        &self,
        id: PodcastId,
        segments: &[DialogueSegment],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(query_failed)?;

        sqlx::query("DELETE FROM transcript_segments WHERE podcast_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(query_failed)?;

        for (position, segment) in segments.iter().enumerate() {
            sqlx::query(
                "INSERT INTO transcript_segments (podcast_id, position, speaker, line) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id.as_uuid())
            .bind(position as i32)
            .bind(&segment.speaker)
            .bind(&segment.line)
            .execute(&mut *tx)
            .await
            .map_err(query_failed)?;
        }

        tx.commit().await.map_err(query_failed)?;
        Ok(())
    }

    #[instrument(skip(self), fields(podcast_id = %id.as_uuid()))]
    async fn transcript(&self, id: PodcastId) -> Result<Vec<DialogueSegment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT speaker, line FROM transcript_segments \
             WHERE podcast_id = $1 ORDER BY position",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.into_iter()
            .map(|row| {
                Ok(DialogueSegment {
                    speaker: row.try_get("speaker").map_err(query_failed)?,
                    line: row.try_get("line").map_err(query_failed)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self, tags), fields(podcast_id = %id.as_uuid(), tags = tags.len()))]
    async fn add_tags(&self, id: PodcastId, tags: &[String]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(query_failed)?;
        for tag in tags {
            sqlx::query("INSERT INTO podcast_tags (podcast_id, label) VALUES ($1, $2)")
                .bind(id.as_uuid())
                .bind(tag)
                .execute(&mut *tx)
                .await
                .map_err(query_failed)?;
        }
        tx.commit().await.map_err(query_failed)?;
        Ok(())
    }

    #[instrument(skip(self), fields(podcast_id = %id.as_uuid()))]
    async fn tags(&self, id: PodcastId) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT label FROM podcast_tags WHERE podcast_id = $1")
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;

        rows.into_iter()
            .map(|row| row.try_get("label").map_err(query_failed))
            .collect()
    }

    #[instrument(skip(self, changes), fields(podcast_id = %id.as_uuid()))]
    async fn update(
        &self,
        id: PodcastId,
        changes: PodcastUpdate,
    ) -> Result<Podcast, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE podcasts SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(title) = changes.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(summary) = changes.summary {
            builder.push(", summary = ").push_bind(summary);
        }
        if let Some(audio_reference) = changes.audio_reference {
            builder.push(", audio_reference = ").push_bind(audio_reference);
        }
        if let Some(duration) = changes.duration_seconds {
            builder
                .push(", duration_seconds = ")
                .push_bind(duration as i32);
        }
        if let Some(status) = changes.status {
            builder.push(", status = ").push_bind(status.as_str());
        }
        if let Some(host) = changes.host {
            builder
                .push(", host_personality = ")
                .push_bind(host.as_str().to_string());
        }
        if let Some(cohost) = changes.cohost {
            builder
                .push(", cohost_personality = ")
                .push_bind(cohost.as_str().to_string());
        }
        if let Some(generated_at) = changes.generated_at {
            builder.push(", generated_at = ").push_bind(generated_at);
        }
        if changes.clear_error {
            builder.push(", error_message = NULL");
        }
        if changes.clear_audio {
            builder.push(", audio_reference = NULL, duration_seconds = NULL");
        }

        builder.push(" WHERE id = ").push_bind(id.as_uuid());
        builder.push(" RETURNING ").push(PODCAST_COLUMNS);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;

        match row {
            Some(row) => read_podcast(&row),
            None => Err(RepositoryError::NotFound(id.as_uuid().to_string())),
        }
    }

    #[instrument(skip(self), fields(podcast_id = %id.as_uuid()))]
    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM podcasts WHERE id = $1",
            PODCAST_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(|r| read_podcast(&r)).transpose()
    }

    #[instrument(skip(self), fields(owner_id = %owner.as_uuid()))]
    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Podcast>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM podcasts WHERE owner_id = $1 ORDER BY created_at DESC",
            PODCAST_COLUMNS
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(read_podcast).collect()
    }
}
