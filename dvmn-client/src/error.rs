//! Poll failures, classified the way the poll loop reacts to them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError {
    /// The client-side wait bound elapsed with no response. Expected on quiet periods.
    #[error("long poll wait expired")]
    WaitExpired,

    /// The server could not be reached at all (DNS, refused, reset before a response).
    #[error("cannot reach review API: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status.
    #[error("review API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body is not a valid poll response.
    #[error("malformed review API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be built from its settings.
    #[error("invalid review API settings: {0}")]
    Config(String),

    /// Any other request failure.
    #[error("review API request failed: {0}")]
    Request(String),
}

impl PollError {
    /// Maps a transport error. Connect errors are checked first because a connect timeout
    /// reports both `is_connect` and `is_timeout`.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_connect() {
            PollError::Connection(e.to_string())
        } else if e.is_timeout() {
            PollError::WaitExpired
        } else {
            PollError::Request(e.to_string())
        }
    }
}
