use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::models::video::{AcceptedResponse, ErrorResponse, JobRequest, ProcessRequest};

/// POST /process — accept a processing job (called by the uploader API).
///
/// The 202 acknowledges that processing has started, not that it finished;
/// callers observe the outcome through the videos table.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), (StatusCode, Json<ErrorResponse>)> {
    let Some(job) = into_job(req) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing required fields".to_string(),
            }),
        ));
    };

    tracing::info!(job_id = %job.job_id, source_key = %job.source_key, "Accepted processing job");
    metrics::counter!("processing_jobs_total").increment(1);

    if let Err(e) = state.dispatcher.dispatch(job) {
        tracing::error!(error = %e, "Failed to enqueue job");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Internal Server Error".to_string(),
            }),
        ));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            message: "Processing started".to_string(),
        }),
    ))
}

/// All three fields are required and must be non-empty.
fn into_job(req: ProcessRequest) -> Option<JobRequest> {
    if req.validate().is_err() {
        return None;
    }
    match (req.job_id, req.source_key, req.bucket) {
        (Some(job_id), Some(source_key), Some(bucket)) => Some(JobRequest {
            job_id,
            source_key,
            bucket,
        }),
        _ => None,
    }
}
