//! Execution-event hook interface for VM instrumentation.
//!
//! An engine that supports instrumentation drives implementations of
//! [`ExecHook`] at defined milestones of a run: run start, one callback per
//! executed instruction, scope boundaries, faults, and run/transaction end.
//! The payload types are fixed at this boundary as plain data so hooks stay
//! independent of any particular engine's internals.
//!
//! Hooks that want to end a run early do so cooperatively: the engine hands
//! out a [`RunHandle`] at run start, and [`RunHandle::abort`] asks the engine
//! to unwind at the next opportunity.

mod event;
mod hook;

pub use event::{Address, CallFrame, CallKind, Op, RunEnd, ScopeExit, Step, Word};
pub use hook::{ExecHook, NoopHook, RunControl, RunHandle};
