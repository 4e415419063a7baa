use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::models::video::JobRequest;
use crate::services::pipeline::JobPipeline;

/// Hands accepted jobs to a fixed pool of pipeline workers through an
/// in-process queue. Request handlers never wait on processing, and the pool
/// size caps how many ffmpeg invocations run at once.
///
/// There is no deduplication and no retry: every dispatched job is run
/// exactly once, and two jobs with the same id race independently on the
/// ledger row.
pub struct JobDispatcher {
    tx: mpsc::UnboundedSender<JobRequest>,
}

impl JobDispatcher {
    /// Spawn `worker_count` workers draining the queue into `pipeline`.
    pub fn start(pipeline: Arc<JobPipeline>, worker_count: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx = Arc::new(Mutex::new(rx));

        for worker_id in 0..worker_count {
            let rx = Arc::clone(&rx);
            let pipeline = Arc::clone(&pipeline);

            tokio::spawn(async move {
                tracing::debug!(worker_id, "Pipeline worker started");
                loop {
                    let job = { rx.lock().await.recv().await };
                    match job {
                        Some(job) => {
                            metrics::gauge!("processing_queue_depth").decrement(1.0);
                            pipeline.run(&job).await;
                        }
                        None => {
                            tracing::debug!(worker_id, "Job queue closed, worker exiting");
                            break;
                        }
                    }
                }
            });
        }

        Self { tx }
    }

    /// Enqueue one job. Returns immediately; the queue is unbounded so
    /// acceptance never depends on pipeline backlog.
    pub fn dispatch(&self, job: JobRequest) -> Result<(), DispatchError> {
        self.tx.send(job).map_err(|_| DispatchError::QueueClosed)?;
        metrics::gauge!("processing_queue_depth").increment(1.0);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("job queue is closed")]
    QueueClosed,
}
