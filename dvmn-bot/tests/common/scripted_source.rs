//! [`ReviewSource`] that replays a fixed script of poll results.
//!
//! Records the cursor of every request. Once the script is exhausted it signals
//! `exhausted` and then never answers, so `run_until(exhausted.notified())` ends the loop.

use async_trait::async_trait;
use dvmn_client::{PollError, PollResponse, ReviewAttempt, ReviewSource, Timestamp};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub type PollResult = Result<PollResponse, PollError>;

pub struct ScriptedSource {
    script: Mutex<VecDeque<PollResult>>,
    cursors: Mutex<Vec<Option<Timestamp>>>,
    pub exhausted: Arc<Notify>,
}

impl ScriptedSource {
    pub fn new(script: Vec<PollResult>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            cursors: Mutex::new(Vec::new()),
            exhausted: Arc::new(Notify::new()),
        }
    }

    /// Cursors received so far, one per request (including the one left hanging).
    pub fn cursors(&self) -> Vec<Option<Timestamp>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewSource for ScriptedSource {
    async fn poll(&self, cursor: Option<Timestamp>) -> PollResult {
        self.cursors.lock().unwrap().push(cursor);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.exhausted.notify_one();
                std::future::pending().await
            }
        }
    }
}

pub fn timeout(ts: f64) -> PollResult {
    Ok(PollResponse::Timeout {
        timestamp_to_request: Timestamp(ts),
    })
}

pub fn found(ts: f64, attempts: Vec<ReviewAttempt>) -> PollResult {
    Ok(PollResponse::Found {
        last_attempt_timestamp: Timestamp(ts),
        new_attempts: attempts,
    })
}

pub fn attempt(title: &str, url: &str, is_negative: bool) -> ReviewAttempt {
    ReviewAttempt {
        lesson_title: title.to_string(),
        lesson_url: url.to_string(),
        is_negative,
    }
}
