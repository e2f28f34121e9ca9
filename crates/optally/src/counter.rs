//! Instruction-frequency counting hook.

use optally_hook::{CallFrame, ExecHook, RunHandle, Step};
use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;
use tracing::trace;

use crate::cancel::CancelToken;
use crate::tally::Tally;

/// Failure producing the result projection.
#[derive(Debug, Error)]
pub enum ResultError {
    #[error("tally serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Final output of a counting run.
#[derive(Clone, Debug, Serialize)]
pub struct TraceResult {
    /// JSON object mapping opcode mnemonic to execution count.
    pub counts: Box<RawValue>,
    /// Why the run was stopped early; absent on natural completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Execution hook that tallies executed instruction kinds over one run.
///
/// Only the step callback does work; the rest of the capability set falls
/// through to the no-op defaults. External cancellation goes through the
/// shared [`CancelToken`]: once the token is set, the step path stops
/// counting and asks the engine to abort via the handle captured at run
/// start. Supervisors that need to cancel mid-run clone the token before the
/// hook is handed to the engine.
#[derive(Debug, Default)]
pub struct Opcount {
    handle: Option<RunHandle>,
    tally: Tally,
    token: CancelToken,
}

impl Opcount {
    /// Create a hook, accepting and ignoring an opaque configuration blob.
    ///
    /// The blob is whatever the registration layer was handed for this hook
    /// name; none of it is interpreted and no content makes construction
    /// fail.
    #[must_use]
    pub fn new(config: Option<&RawValue>) -> Self {
        let _ = config;
        Self::default()
    }

    /// Shared token for cancelling this hook's run from another thread.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Request cancellation of the run at the first opportunity.
    ///
    /// Idempotent; the first caller's reason is the one reported by
    /// [`Opcount::result`].
    pub fn stop(&self, reason: impl Into<String>) {
        self.token.cancel(reason);
    }

    /// Project the tally and stop reason for the reporting layer.
    ///
    /// Errors only if the tally cannot be serialized; a cancellation reason
    /// travels in the returned value, not the error channel. Callable any
    /// number of times once the run has ended, yielding identical snapshots.
    pub fn result(&self) -> Result<TraceResult, ResultError> {
        let counts = serde_json::value::to_raw_value(self.tally.counts())?;
        Ok(TraceResult {
            counts,
            reason: self.token.reason().map(str::to_owned),
        })
    }

    /// Direct view of the accumulated counts.
    #[must_use]
    pub const fn tally(&self) -> &Tally {
        &self.tally
    }
}

impl ExecHook for Opcount {
    fn on_run_start(&mut self, handle: &RunHandle, _frame: &CallFrame<'_>) {
        self.handle = Some(handle.clone());
    }

    fn on_step(&mut self, step: &Step<'_>) {
        // A cancelled run counts nothing further; re-issue the abort until
        // the engine unwinds, however many steps that takes.
        if self.token.is_cancelled() {
            if let Some(handle) = &self.handle {
                trace!(pc = step.pc, op = step.op.mnemonic, "requesting engine abort");
                handle.abort();
            }
            return;
        }
        self.tally.record(step.op);
    }
}
