use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ErrorResponse;
use crate::application::ports::RepositoryError;
use crate::application::services::{EditOutcome, GenerationError, PodcastEdit};
use crate::domain::{DialogueSegment, PersonalityId, PodcastId};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct UpdatePodcastRequest {
    pub title: Option<String>,
    pub dialogue: Option<Vec<DialogueSegment>>,
    pub host: Option<String>,
    pub cohost: Option<String>,
}

#[derive(Serialize)]
pub struct UpdatePodcastResponse {
    pub id: String,
    pub status: String,
    pub regenerating: bool,
}

#[tracing::instrument(skip(state, request))]
pub async fn update_podcast_handler(
    State(state): State<AppState>,
    Path(podcast_id): Path<String>,
    Json(request): Json<UpdatePodcastRequest>,
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

    let edit = PodcastEdit {
        title: request.title,
        dialogue: request.dialogue,
        host: request.host.map(PersonalityId::new),
        cohost: request.cohost.map(PersonalityId::new),
    };

    match state.orchestrator.apply_edit(id, edit).await {
        Ok(EditOutcome::Updated(podcast)) => (
            StatusCode::OK,
            Json(UpdatePodcastResponse {
                id: podcast.id.as_uuid().to_string(),
                status: podcast.status.as_str().to_string(),
                regenerating: false,
            }),
        )
            .into_response(),
        Ok(EditOutcome::RegenerationStarted(podcast)) => (
            StatusCode::ACCEPTED,
            Json(UpdatePodcastResponse {
                id: podcast.id.as_uuid().to_string(),
                status: podcast.status.as_str().to_string(),
                regenerating: true,
            }),
        )
            .into_response(),
        Err(GenerationError::Repository(RepositoryError::NotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Podcast not found: {}", podcast_id),
            }),
        )
            .into_response(),
        Err(GenerationError::InvalidCast) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: GenerationError::InvalidCast.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to apply podcast edit");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to apply edit: {}", e),
                }),
            )
                .into_response()
        }
    }
}
