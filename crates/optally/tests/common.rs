//! Scripted engine stand-in for integration tests.
//!
//! Drives the full hook callback set over a fixed instruction stream and
//! honors abort requests with a configurable latency, the way a real engine
//! may execute a few more instructions before it unwinds.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use optally::{
    CallFrame, CallKind, CancelToken, ExecHook, Op, RunControl, RunEnd, RunHandle, ScopeExit, Step,
};

pub const ADD: Op = Op::new(0x01, "ADD");
pub const MUL: Op = Op::new(0x02, "MUL");
pub const PUSH1: Op = Op::new(0x60, "PUSH1");
pub const SSTORE: Op = Op::new(0x55, "SSTORE");

pub const CALLER: [u8; 20] = [0xaa; 20];
pub const CONTRACT: [u8; 20] = [0xbb; 20];
pub const RUN_GAS: u64 = 100_000;

/// Records abort requests; the engine side of [`RunControl`].
#[derive(Default)]
pub struct AbortFlag {
    requested: AtomicBool,
    requests: AtomicUsize,
}

impl AbortFlag {
    pub fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl RunControl for AbortFlag {
    fn abort(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a scripted run did.
pub struct Outcome {
    /// Engine unwound early because the hook requested an abort.
    pub aborted: bool,
    /// Step events actually delivered to the hook.
    pub delivered: usize,
    /// Abort requests the hook issued against the handle.
    pub abort_requests: usize,
}

/// Synchronous engine stand-in.
#[derive(Default)]
pub struct ScriptedVm {
    /// Steps still delivered after an abort request before the engine
    /// unwinds.
    pub abort_latency: usize,
    /// Cancel `token` with the reason once this many steps were delivered,
    /// simulating a supervisor that fires mid-run.
    pub cancel_at: Option<(usize, CancelToken, &'static str)>,
    /// Emit a sub-call scope enter/exit pair halfway through the program.
    pub emit_scopes: bool,
    /// Fault the final instruction instead of completing normally.
    pub fault: Option<&'static str>,
}

impl ScriptedVm {
    pub fn run(&self, hook: &mut dyn ExecHook, program: &[Op]) -> Outcome {
        let control = Arc::new(AbortFlag::default());
        let handle = RunHandle::new(Arc::clone(&control) as Arc<dyn RunControl>);
        let frame = CallFrame {
            kind: CallKind::Call,
            caller: CALLER,
            target: CONTRACT,
            input: &[0x06, 0xfd, 0xde, 0x03],
            gas: RUN_GAS,
            value: [0; 32],
        };

        hook.on_tx_start(RUN_GAS);
        hook.on_run_start(&handle, &frame);

        let mut delivered = 0;
        let mut aborted = false;
        let mut grace = self.abort_latency;
        let mut gas = RUN_GAS;
        let scope_boundary = program.len() / 2;

        for (pc, op) in program.iter().copied().enumerate() {
            if control.requested() {
                if grace == 0 {
                    aborted = true;
                    break;
                }
                grace -= 1;
            }
            if self.emit_scopes && pc == scope_boundary && pc > 0 {
                hook.on_scope_enter(&CallFrame {
                    kind: CallKind::Call,
                    caller: CONTRACT,
                    target: CALLER,
                    input: &[],
                    gas: gas / 2,
                    value: [0; 32],
                });
                hook.on_scope_exit(&ScopeExit {
                    output: &[0x01],
                    gas_used: 21,
                    fault: None,
                });
            }
            let is_last = pc + 1 == program.len();
            let step = Step {
                pc: pc as u64,
                op,
                gas,
                cost: 3,
                contract: CONTRACT,
                return_data: &[],
                depth: 1,
                fault: if is_last { self.fault } else { None },
            };
            if let (true, Some(fault)) = (is_last, self.fault) {
                hook.on_fault(&step, fault);
            } else {
                hook.on_step(&step);
                delivered += 1;
            }
            gas = gas.saturating_sub(3);
            if let Some((at, token, reason)) = &self.cancel_at {
                if delivered == *at {
                    token.cancel(*reason);
                }
            }
        }

        hook.on_run_end(&RunEnd {
            output: &[],
            gas_used: RUN_GAS - gas,
            fault: if aborted { Some("execution aborted") } else { self.fault },
        });
        hook.on_tx_end(gas);

        Outcome {
            aborted,
            delivered,
            abort_requests: control.requests(),
        }
    }
}
