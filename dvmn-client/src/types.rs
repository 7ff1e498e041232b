//! Wire types of the long-polling endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Poll cursor as issued by the server (Unix time with a fractional part).
/// Opaque to the client: it is only ever echoed back as the `timestamp` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub f64);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reviewed lesson submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAttempt {
    pub lesson_title: String,
    pub lesson_url: String,
    pub is_negative: bool,
}

/// Body of a successful poll, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PollResponse {
    /// The server held the request until its own deadline; nothing was reviewed.
    Timeout { timestamp_to_request: Timestamp },
    /// New reviews are available.
    Found {
        last_attempt_timestamp: Timestamp,
        new_attempts: Vec<ReviewAttempt>,
    },
}

impl PollResponse {
    /// Cursor to send with the next request.
    pub fn next_cursor(&self) -> Timestamp {
        match self {
            PollResponse::Timeout {
                timestamp_to_request,
            } => *timestamp_to_request,
            PollResponse::Found {
                last_attempt_timestamp,
                ..
            } => *last_attempt_timestamp,
        }
    }
}
