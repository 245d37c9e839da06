use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ErrorResponse;
use crate::domain::OwnerId;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ListPodcastsParams {
    pub owner_id: Uuid,
}

#[derive(Serialize)]
pub struct PodcastSummary {
    pub id: String,
    pub title: Option<String>,
    pub status: String,
    pub duration_seconds: Option<u32>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ListPodcastsResponse {
    pub podcasts: Vec<PodcastSummary>,
}

#[tracing::instrument(skip(state, params))]
pub async fn list_podcasts_handler(
    State(state): State<AppState>,
    Query(params): Query<ListPodcastsParams>,
) -> impl IntoResponse {
    match state
        .repository
        .find_by_owner(OwnerId::from_uuid(params.owner_id))
        .await
    {
        Ok(podcasts) => {
            let summaries = podcasts
                .into_iter()
                .map(|p| PodcastSummary {
                    id: p.id.as_uuid().to_string(),
                    title: p.title,
                    status: p.status.as_str().to_string(),
                    duration_seconds: p.duration_seconds,
                    created_at: p.created_at.to_rfc3339(),
                })
                .collect();
            (
                StatusCode::OK,
                Json(ListPodcastsResponse {
                    podcasts: summaries,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list podcasts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list podcasts: {}", e),
                }),
            )
                .into_response()
        }
    }
}
