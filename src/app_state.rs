use std::sync::Arc;

use crate::services::dispatcher::JobDispatcher;

/// Shared application state passed to the processor's route handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<JobDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: JobDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
