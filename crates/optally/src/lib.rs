//! Instruction-frequency execution hook for VM engines.
//!
//! [`Opcount`] implements the full [`ExecHook`] capability set but does real
//! work only in the step callback: it tallies how many times each instruction
//! kind executed over a single run. A supervisor thread can stop the run
//! early through a shared [`CancelToken`]; once the token is set the hook
//! counts nothing further and asks the engine to abort via the handle it
//! captured at run start. After the run, [`Opcount::result`] projects the
//! serialized tally together with the stop reason, if any.
//!
//! # Example
//!
//! ```
//! use optally::{ExecHook, Op, Opcount, Step};
//!
//! let mut hook = Opcount::default();
//! let add = Step {
//!     pc: 0,
//!     op: Op::new(0x01, "ADD"),
//!     gas: 100_000,
//!     cost: 3,
//!     contract: [0; 20],
//!     return_data: &[],
//!     depth: 1,
//!     fault: None,
//! };
//! hook.on_step(&add);
//! hook.on_step(&add);
//!
//! let result = hook.result()?;
//! assert_eq!(result.counts.get(), r#"{"ADD":2}"#);
//! assert!(result.reason.is_none());
//! # Ok::<(), optally::ResultError>(())
//! ```

// Re-export the hook interface so engines and hooks agree on one boundary.
pub use optally_hook::{
    Address, CallFrame, CallKind, ExecHook, NoopHook, Op, RunControl, RunEnd, RunHandle,
    ScopeExit, Step, Word,
};

mod cancel;
mod counter;
mod tally;

pub use cancel::CancelToken;
pub use counter::{Opcount, ResultError, TraceResult};
pub use tally::Tally;
