//! Unit tests for the review module.


use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp for test data.
fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}
