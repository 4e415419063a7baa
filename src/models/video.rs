use garde::Validate;
use serde::{Deserialize, Serialize};

/// Status of a video in the processing ledger.
///
/// Transitions are monotonic: PENDING → PROCESSING → COMPLETED | FAILED.
/// The pipeline only ever writes the two terminal states; earlier
/// transitions belong to the uploader.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "PENDING",
            VideoStatus::Processing => "PROCESSING",
            VideoStatus::Completed => "COMPLETED",
            VideoStatus::Failed => "FAILED",
        }
    }
}

/// Request to trigger processing of an uploaded video (sent by the uploader API).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[garde(length(min = 1, max = 200))]
    pub job_id: Option<String>,

    #[garde(length(min = 1, max = 1024))]
    pub source_key: Option<String>,

    #[garde(length(min = 1, max = 200))]
    pub bucket: Option<String>,
}

/// One accepted processing job, as handed to the pipeline workers.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job_id: String,
    pub source_key: String,
    pub bucket: String,
}

/// Response after a job has been accepted for background processing.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub message: String,
}

/// Error body shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
