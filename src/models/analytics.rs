use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-video engagement counters, one row per video.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VideoStats {
    pub video_id: String,
    pub views_count: i64,
    pub likes_count: i64,
    pub last_updated: DateTime<Utc>,
}

/// Request body for the view/like counter endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRequest {
    pub video_id: Option<String>,
}

/// Response after incrementing the view counter.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub message: String,
    pub views: i64,
}

/// Response after incrementing the like counter.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: i64,
}
