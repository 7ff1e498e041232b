//! # dvmn-client
//!
//! Client for the dvmn.org review long-polling API: response types ([`PollResponse`],
//! [`ReviewAttempt`]), error classification ([`PollError`]) and the [`ReviewSource`] seam
//! the poll loop depends on, implemented over HTTP by [`DvmnClient`].

mod client;
mod error;
mod types;

pub use client::{mask_token, DvmnClient, ReviewSource, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT};
pub use error::PollError;
pub use types::{PollResponse, ReviewAttempt, Timestamp};
