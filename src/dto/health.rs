use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::format_system_time;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// RFC 3339 time of the last completed full sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

impl HealthResponse {
    /// Create a health response indicating the workbook is reachable.
    pub fn ok(last_sync: Option<SystemTime>) -> Self {
        Self {
            status: "ok".to_string(),
            last_sync: last_sync.map(format_system_time),
        }
    }

    /// Create a health response indicating the workbook cannot be read.
    pub fn degraded(last_sync: Option<SystemTime>) -> Self {
        Self {
            status: "degraded".to_string(),
            last_sync: last_sync.map(format_system_time),
        }
    }
}
