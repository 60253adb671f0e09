use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report `ok` while the workbook answers, `degraded` otherwise, along with the last full sync.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let last_sync = state.last_full_sync().await;

    match state.store().health_check().await {
        Ok(()) => HealthResponse::ok(last_sync),
        Err(err) => {
            warn!(error = %err, "workbook health check failed");
            HealthResponse::degraded(last_sync)
        }
    }
}
