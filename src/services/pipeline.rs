use std::sync::Arc;
use std::time::Instant;

use crate::db::ledger::StatusLedger;
use crate::models::video::JobRequest;
use crate::services::storage::{BlobStore, StorageError};
use crate::services::thumbnail::{ThumbnailError, ThumbnailExtractor};

/// Storage key of a derived thumbnail: fixed prefix, job id, fixed extension.
pub fn thumbnail_key(job_id: &str) -> String {
    format!("thumbnails/{}.png", job_id)
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[source] StorageError),

    #[error("transform failed: {0}")]
    Transform(#[from] ThumbnailError),

    #[error("publish failed: {0}")]
    Publish(#[source] StorageError),
}

/// The per-job processing pipeline: fetch the source, extract a thumbnail,
/// publish it, record the outcome, clean up.
///
/// Each step runs at most once per invocation. Any step failure is terminal
/// for the job and ends in a best-effort FAILED write; nothing already
/// published is rolled back. The submitter was acknowledged before the
/// pipeline started, so no error leaves this module.
pub struct JobPipeline {
    storage: Arc<dyn BlobStore>,
    thumbnailer: Arc<dyn ThumbnailExtractor>,
    ledger: Arc<dyn StatusLedger>,
}

impl JobPipeline {
    pub fn new(
        storage: Arc<dyn BlobStore>,
        thumbnailer: Arc<dyn ThumbnailExtractor>,
        ledger: Arc<dyn StatusLedger>,
    ) -> Self {
        Self {
            storage,
            thumbnailer,
            ledger,
        }
    }

    /// Run one job to its terminal state.
    pub async fn run(&self, job: &JobRequest) {
        tracing::info!(
            job_id = %job.job_id,
            source_key = %job.source_key,
            bucket = %job.bucket,
            "Processing video"
        );
        let start = Instant::now();

        match self.execute(job).await {
            Ok(key) => {
                metrics::histogram!("thumbnail_processing_seconds")
                    .record(start.elapsed().as_secs_f64());
                metrics::counter!("processing_jobs_completed").increment(1);

                match self.ledger.mark_completed(&job.job_id, &key).await {
                    Ok(true) => {
                        tracing::info!(job_id = %job.job_id, thumbnail_key = %key, "Video processed")
                    }
                    Ok(false) => {
                        tracing::warn!(job_id = %job.job_id, "No ledger row to mark completed")
                    }
                    Err(e) => {
                        tracing::error!(job_id = %job.job_id, error = %e, "Failed to record completion")
                    }
                }
            }
            Err(e) => {
                metrics::counter!("processing_jobs_failed").increment(1);
                tracing::error!(job_id = %job.job_id, error = %e, "Video processing failed");

                match self.ledger.mark_failed(&job.job_id).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(job_id = %job.job_id, "No ledger row to mark failed")
                    }
                    Err(e) => {
                        tracing::error!(job_id = %job.job_id, error = %e, "Failed to record failure")
                    }
                }
            }
        }
    }

    /// Steps 1–3. The scratch directory scopes both temporary files; dropping
    /// it removes them on every exit path.
    async fn execute(&self, job: &JobRequest) -> Result<String, PipelineError> {
        let scratch =
            tempfile::tempdir().map_err(|e| PipelineError::Fetch(StorageError::Io(e)))?;
        let source_path = scratch.path().join("source.mp4");
        let thumb_path = scratch.path().join("thumbnail.png");

        self.storage
            .fetch(&job.bucket, &job.source_key, &source_path)
            .await
            .map_err(PipelineError::Fetch)?;

        self.thumbnailer.extract(&source_path, &thumb_path).await?;

        let key = thumbnail_key(&job.job_id);
        self.storage
            .publish(&job.bucket, &key, &thumb_path, "image/png")
            .await
            .map_err(PipelineError::Publish)?;

        Ok(key)
    }
}

#[cfg(test)]
pub(crate) mod doubles {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::db::ledger::StatusLedger;
    use crate::services::storage::{BlobStore, StorageError};
    use crate::services::thumbnail::{ThumbnailError, ThumbnailExtractor};

    /// Blob store double writing a marker file on fetch and recording every
    /// local path it touched, so tests can assert cleanup.
    #[derive(Default)]
    pub(crate) struct StubStore {
        pub fail_fetch: bool,
        pub fail_publish: bool,
        pub fetches: AtomicUsize,
        pub publishes: AtomicUsize,
        pub fetched_paths: Mutex<Vec<PathBuf>>,
        pub published_keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for StubStore {
        async fn fetch(&self, _bucket: &str, _key: &str, dest: &Path) -> Result<(), StorageError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                return Err(StorageError::NotFound);
            }
            tokio::fs::write(dest, b"video-bytes").await?;
            self.fetched_paths.lock().unwrap().push(dest.to_path_buf());
            Ok(())
        }

        async fn publish(
            &self,
            _bucket: &str,
            key: &str,
            _src: &Path,
            _content_type: &str,
        ) -> Result<(), StorageError> {
            self.publishes.fetch_add(1, Ordering::SeqCst);
            if self.fail_publish {
                return Err(StorageError::Config("upload refused".to_string()));
            }
            self.published_keys.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    /// Thumbnailer double with an optional artificial delay and in-flight
    /// tracking, so dispatcher tests can observe concurrency.
    #[derive(Default)]
    pub(crate) struct StubThumbnailer {
        pub fail: bool,
        pub delay_ms: u64,
        pub calls: AtomicUsize,
        pub in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
        pub output_paths: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl ThumbnailExtractor for StubThumbnailer {
        async fn extract(&self, _input: &Path, output: &Path) -> Result<(), ThumbnailError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }

            let result = if self.fail {
                Err(ThumbnailError::Ffmpeg("moov atom not found".to_string()))
            } else {
                tokio::fs::write(output, b"png-bytes").await?;
                self.output_paths.lock().unwrap().push(output.to_path_buf());
                Ok(())
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    /// Ledger double recording every terminal write.
    pub(crate) struct RecordingLedger {
        pub row_exists: bool,
        pub completed: Mutex<Vec<(String, String)>>,
        pub failed: Mutex<Vec<String>>,
    }

    impl Default for RecordingLedger {
        fn default() -> Self {
            Self {
                row_exists: true,
                completed: Mutex::new(Vec::new()),
                failed: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecordingLedger {
        pub fn terminal_writes(&self) -> usize {
            self.completed.lock().unwrap().len() + self.failed.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StatusLedger for RecordingLedger {
        async fn mark_completed(
            &self,
            job_id: &str,
            thumbnail_key: &str,
        ) -> Result<bool, sqlx::Error> {
            self.completed
                .lock()
                .unwrap()
                .push((job_id.to_string(), thumbnail_key.to_string()));
            Ok(self.row_exists)
        }

        async fn mark_failed(&self, job_id: &str) -> Result<bool, sqlx::Error> {
            self.failed.lock().unwrap().push(job_id.to_string());
            Ok(self.row_exists)
        }
    }
}
