use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;

use crate::db::analytics;
use crate::models::analytics::{CounterRequest, LikeResponse, VideoStats, ViewResponse};
use crate::models::video::ErrorResponse;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /api/analytics/view — bump the view counter for a video.
pub async fn increment_view(
    State(pool): State<PgPool>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<ViewResponse>, ApiError> {
    let video_id = require_video_id(req)?;

    match analytics::increment_view(&pool, &video_id).await {
        Ok(Some(views)) => Ok(Json(ViewResponse {
            message: "View count updated".to_string(),
            views,
        })),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!(video_id = %video_id, error = %e, "Error updating view count");
            Err(internal_error())
        }
    }
}

/// POST /api/analytics/like — bump the like counter for a video.
pub async fn increment_like(
    State(pool): State<PgPool>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let video_id = require_video_id(req)?;

    match analytics::increment_like(&pool, &video_id).await {
        Ok(Some(likes)) => Ok(Json(LikeResponse {
            message: "Like count updated".to_string(),
            likes,
        })),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!(video_id = %video_id, error = %e, "Error updating like count");
            Err(internal_error())
        }
    }
}

/// GET /api/analytics/{video_id} — current counters for a video.
pub async fn get_stats(
    State(pool): State<PgPool>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoStats>, ApiError> {
    match analytics::get_stats(&pool, &video_id).await {
        Ok(Some(stats)) => Ok(Json(stats)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!(video_id = %video_id, error = %e, "Error fetching video stats");
            Err(internal_error())
        }
    }
}

fn require_video_id(req: CounterRequest) -> Result<String, ApiError> {
    match req.video_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing videoId".to_string(),
            }),
        )),
    }
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Video not found".to_string(),
        }),
    )
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_video_id_is_rejected() {
        assert!(require_video_id(CounterRequest { video_id: None }).is_err());
        assert!(require_video_id(CounterRequest {
            video_id: Some(String::new())
        })
        .is_err());
    }

    #[test]
    fn test_present_video_id_passes_through() {
        let id = require_video_id(CounterRequest {
            video_id: Some("v1".to_string()),
        })
        .unwrap();
        assert_eq!(id, "v1");
    }
}
