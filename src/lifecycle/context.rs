//! Cancellation scope handed to `App::stop`.
//!
//! # Responsibilities
//! - Carry a cancellation signal shared by every stop task of one shutdown
//! - Carry an optional deadline
//! - Let applications wait on whichever comes first
//!
//! # Design Decisions
//! - Built on `tokio_util::sync::CancellationToken` so child scopes cancel with their parent
//! - An expired deadline counts as cancellation
//! - Cloning shares the scope; `child` derives a new one

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline scope.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A root scope with no deadline. Only cancelled by an explicit `cancel`.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A root scope that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A root scope that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a scope that is cancelled together with `self` but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child scope whose deadline is the earlier of the parent's and
    /// `now + timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let requested = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) => parent.min(requested),
            None => requested,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Cancel this scope and every scope derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the scope was cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, zero if it already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Resolve when the scope is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
