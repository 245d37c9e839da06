use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ErrorResponse;
use crate::application::services::GenerationError;
use crate::domain::{OwnerId, PersonalityId, SourceKind, SourceReference};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CreatePodcastRequest {
    pub owner_id: Uuid,
    pub source_kind: String,
    pub source: String,
    pub host: String,
    pub cohost: String,
}

#[derive(Serialize)]
pub struct CreatePodcastResponse {
    pub id: String,
    pub status: String,
    pub message: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn create_podcast_handler(
    State(state): State<AppState>,
    Json(request): Json<CreatePodcastRequest>,
) -> impl IntoResponse {
    let kind = match SourceKind::from_str(&request.source_kind) {
        Ok(k) => k,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    let source = SourceReference {
        kind,
        value: request.source,
    };

    let result = state
        .orchestrator
        .start_generation(
            OwnerId::from_uuid(request.owner_id),
            source,
            PersonalityId::new(request.host),
            PersonalityId::new(request.cohost),
        )
        .await;

    match result {
        Ok(podcast) => {
            tracing::info!(
                podcast_id = %podcast.id.as_uuid(),
                owner_id = %podcast.owner_id.as_uuid(),
                "Podcast generation accepted"
            );
            (
                StatusCode::ACCEPTED,
                Json(CreatePodcastResponse {
                    id: podcast.id.as_uuid().to_string(),
                    status: podcast.status.as_str().to_string(),
                    message: "Podcast generation started".to_string(),
                }),
            )
                .into_response()
        }
        Err(GenerationError::InvalidCast) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: GenerationError::InvalidCast.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start podcast generation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start generation: {}", e),
                }),
            )
                .into_response()
        }
    }
}
