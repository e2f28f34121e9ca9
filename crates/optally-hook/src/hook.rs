//! Hook trait and run-control surface.

use std::fmt;
use std::sync::Arc;

use crate::event::{CallFrame, RunEnd, ScopeExit, Step};

/// Abort command a hook may issue against the engine driving its run.
///
/// The request is cooperative: the engine may execute a bounded number of
/// further instructions before it unwinds.
pub trait RunControl: Send + Sync {
    /// Ask the engine to abort the run in progress at the next opportunity.
    fn abort(&self);
}

/// Shared, non-owning reference to the running engine instance.
///
/// Handed to hooks at run start and valid for the duration of that run. Its
/// only capability is [`RunControl::abort`]; hooks never observe or mutate
/// engine state through it.
#[derive(Clone)]
pub struct RunHandle {
    control: Arc<dyn RunControl>,
}

impl RunHandle {
    #[must_use]
    pub fn new(control: Arc<dyn RunControl>) -> Self {
        Self { control }
    }

    /// Request engine-side termination of the run in progress.
    pub fn abort(&self) {
        self.control.abort();
    }
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle").finish_non_exhaustive()
    }
}

/// Callbacks invoked by the engine at defined execution milestones.
///
/// This is the full capability set the engine requires of a registered hook.
/// Every method has a default no-op body, so implementations override only
/// the events they care about.
pub trait ExecHook {
    /// A run is starting; `handle` controls the engine driving it.
    fn on_run_start(&mut self, _handle: &RunHandle, _frame: &CallFrame<'_>) {}

    /// One instruction is about to execute.
    fn on_step(&mut self, _step: &Step<'_>) {}

    /// Execution entered a sub-call or sub-create frame.
    fn on_scope_enter(&mut self, _frame: &CallFrame<'_>) {}

    /// Execution left a frame, even one that ran no code.
    fn on_scope_exit(&mut self, _exit: &ScopeExit<'_>) {}

    /// An instruction faulted.
    fn on_fault(&mut self, _step: &Step<'_>, _fault: &str) {}

    /// The run finished.
    fn on_run_end(&mut self, _end: &RunEnd<'_>) {}

    /// The enclosing transaction began.
    fn on_tx_start(&mut self, _gas_limit: u64) {}

    /// The enclosing transaction finished.
    fn on_tx_end(&mut self, _gas_left: u64) {}
}

/// Hook that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl ExecHook for NoopHook {}
