use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use super::ErrorResponse;
use crate::domain::{DialogueSegment, Podcast, PodcastId};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct PodcastDetailResponse {
    pub id: String,
    pub owner_id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub status: String,
    pub source_kind: String,
    pub source: String,
    pub host: String,
    pub cohost: String,
    pub audio_reference: Option<String>,
    pub duration_seconds: Option<u32>,
    pub error_message: Option<String>,
    pub generated_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub transcript: Vec<DialogueSegment>,
    pub tags: Vec<String>,
}

impl PodcastDetailResponse {
    fn from_parts(podcast: Podcast, transcript: Vec<DialogueSegment>, tags: Vec<String>) -> Self {
        Self {
            id: podcast.id.as_uuid().to_string(),
            owner_id: podcast.owner_id.as_uuid().to_string(),
            title: podcast.title,
            summary: podcast.summary,
            status: podcast.status.as_str().to_string(),
            source_kind: podcast.source.kind.as_str().to_string(),
            source: podcast.source.value,
            host: podcast.host.as_str().to_string(),
            cohost: podcast.cohost.as_str().to_string(),
            audio_reference: podcast.audio_reference,
            duration_seconds: podcast.duration_seconds,
            error_message: podcast.error_message,
            generated_at: podcast.generated_at.map(|t| t.to_rfc3339()),
            created_at: podcast.created_at.to_rfc3339(),
            updated_at: podcast.updated_at.to_rfc3339(),
            transcript,
            tags,
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn podcast_detail_handler(
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&podcast_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid podcast ID: {}", podcast_id),
                }),
            )
                .into_response();
        }
    };
    let id = PodcastId::from_uuid(uuid);

    let podcast = match state.repository.find_by_id(id).await {
        Ok(Some(podcast)) => podcast,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Podcast not found: {}", podcast_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch podcast");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch podcast: {}", e),
                }),
            )
                .into_response();
        }
    };

    let transcript = match state.repository.transcript(id).await {
        Ok(segments) => segments,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcript");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch transcript: {}", e),
                }),
            )
                .into_response();
        }
    };

    let tags = match state.repository.tags(id).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch tags");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch tags: {}", e),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(PodcastDetailResponse::from_parts(podcast, transcript, tags)),
    )
        .into_response()
}
