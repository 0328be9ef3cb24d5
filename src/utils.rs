//! # Utility Functions
//!
//! Small helpers shared by the handlers and the logging layer.
//!
//! ## Core Utilities
//!
//! - **Unique Identifiers**: Request identifiers that correlate log lines of one call
//! - **Timestamps**: RFC 3339 rendering of filesystem times for catalog entries

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Generates a unique identifier for one RPC call.
///
/// The identifier is `{timestamp}-{uuid}`: UTC milliseconds since epoch followed
/// by a random UUID v4, so identifiers sort by creation time and never collide.
///
/// # Example
///
/// ```rust
/// let request_id = memenow_storage_grpc::utils::generate_unique_identifier();
/// // "1641987000000-550e8400-e29b-41d4-a716-446655440000"
/// assert_eq!(request_id.matches('-').count(), 5);
/// ```
pub fn generate_unique_identifier() -> String {
    let uuid_part = Uuid::new_v4().to_string();
    let timestamp = Utc::now().timestamp_millis();
    format!("{}-{}", timestamp, uuid_part)
}

/// Converts a filesystem time to UTC.
pub fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Formats a timestamp as RFC 3339 with second precision, e.g. `2024-01-15T10:30:00Z`.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
