use sqlx::{PgPool, Row};

use crate::models::analytics::VideoStats;

/// Increment the view counter. Returns the new count, or None if the video
/// has no analytics row.
pub async fn increment_view(pool: &PgPool, video_id: &str) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE video_analytics
        SET views_count = views_count + 1, last_updated = NOW()
        WHERE video_id = $1
        RETURNING views_count
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.try_get("views_count")).transpose()
}

/// Increment the like counter. Returns the new count, or None if the video
/// has no analytics row.
pub async fn increment_like(pool: &PgPool, video_id: &str) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE video_analytics
        SET likes_count = likes_count + 1, last_updated = NOW()
        WHERE video_id = $1
        RETURNING likes_count
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.try_get("likes_count")).transpose()
}

/// Fetch the current counters for a video.
pub async fn get_stats(pool: &PgPool, video_id: &str) -> Result<Option<VideoStats>, sqlx::Error> {
    sqlx::query_as::<_, VideoStats>(
        r#"
        SELECT video_id, views_count, likes_count, last_updated
        FROM video_analytics
        WHERE video_id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await
}
