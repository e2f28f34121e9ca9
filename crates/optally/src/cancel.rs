//! Cooperative cancellation token.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::debug;

#[derive(Default)]
struct Shared {
    cancelled: AtomicBool,
    reason: OnceLock<String>,
}

/// Shared cancel flag plus the reason supplied by the first canceller.
///
/// Cloning yields another handle to the same token; supervisors keep a clone
/// while the execution thread polls [`CancelToken::is_cancelled`] once per
/// instruction. The reason is stored before the flag is published with
/// `Release`, so a `true` flag observed through the `Acquire` load implies
/// the reason is visible.
#[derive(Clone, Default)]
pub struct CancelToken {
    shared: Arc<Shared>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// The first caller's reason is retained; repeat calls are no-ops and
    /// never error. Safe to call from any thread, including while the
    /// execution thread is mid-step.
    pub fn cancel(&self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(%reason, "run cancellation requested");
        let _ = self.shared.reason.set(reason);
        self.shared.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Reason supplied by the winning [`CancelToken::cancel`] call, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.shared.reason.get().map(String::as_str)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}
