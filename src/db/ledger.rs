use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::video::VideoStatus;

/// Write-side contract of the video ledger, as used by the pipeline.
///
/// Both updates are single-row conditional writes keyed by the video id and
/// report whether a row was affected; callers only log on zero rows.
#[async_trait]
pub trait StatusLedger: Send + Sync {
    async fn mark_completed(
        &self,
        job_id: &str,
        thumbnail_key: &str,
    ) -> Result<bool, sqlx::Error>;

    async fn mark_failed(&self, job_id: &str) -> Result<bool, sqlx::Error>;
}

/// PostgreSQL-backed ledger over the `videos` table.
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusLedger for PgLedger {
    async fn mark_completed(
        &self,
        job_id: &str,
        thumbnail_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET s3_key_thumbnail = $1, status = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(thumbnail_key)
        .bind(VideoStatus::Completed.as_str())
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_failed(&self, job_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(VideoStatus::Failed.as_str())
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
