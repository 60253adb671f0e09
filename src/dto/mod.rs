use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Inbound edit notifications.
pub mod edit;
/// Health check payloads.
pub mod health;
/// Forced sync reports.
pub mod sync;
/// Outbound dashboard webhook bodies.
pub mod webhook;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
