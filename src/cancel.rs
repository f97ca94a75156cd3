//! Caller-driven cancellation for long traversals.

use crate::error::ApiError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag a caller trips to abort a running traversal
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cancellation token plus optional deadline, checked at every folder entry
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Interrupt {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// `Err(Cancelled)` once the token is tripped or the deadline has passed
    pub fn check(&self, path: &str) -> Result<(), ApiError> {
        if self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(ApiError::Cancelled(path.to_string()));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ApiError::Cancelled(format!("{} (deadline exceeded)", path)));
        }
        Ok(())
    }
}
