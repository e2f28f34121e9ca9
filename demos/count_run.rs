//! Counting a scripted run end to end.
//!
//! A mock engine executes a small instruction program twice: once to
//! completion, then again with a supervisor thread cancelling mid-run. The
//! serialized tally and the stop reason are printed after each run.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example count_run
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use optally::{CallFrame, CallKind, ExecHook, Op, Opcount, RunControl, RunEnd, RunHandle, Step};

const PROGRAM: &[Op] = &[
    Op::new(0x60, "PUSH1"),
    Op::new(0x60, "PUSH1"),
    Op::new(0x01, "ADD"),
    Op::new(0x60, "PUSH1"),
    Op::new(0x02, "MUL"),
    Op::new(0x55, "SSTORE"),
    Op::new(0x00, "STOP"),
];

/// Engine stand-in: executes a step stream and honors abort requests.
struct MiniVm {
    abort: AtomicBool,
}

impl RunControl for MiniVm {
    fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }
}

fn drive(hook: &mut Opcount, steps: impl Iterator<Item = Op>) -> usize {
    let engine = Arc::new(MiniVm {
        abort: AtomicBool::new(false),
    });
    let handle = RunHandle::new(Arc::clone(&engine) as Arc<dyn RunControl>);
    let frame = CallFrame {
        kind: CallKind::Call,
        caller: [0xaa; 20],
        target: [0xbb; 20],
        input: &[],
        gas: 1_000_000,
        value: [0; 32],
    };

    hook.on_tx_start(1_000_000);
    hook.on_run_start(&handle, &frame);

    let mut delivered = 0;
    for (pc, op) in steps.enumerate() {
        if engine.abort.load(Ordering::SeqCst) {
            break;
        }
        hook.on_step(&Step {
            pc: pc as u64,
            op,
            gas: 1_000_000_u64.saturating_sub(delivered as u64 * 3),
            cost: 3,
            contract: [0xbb; 20],
            return_data: &[],
            depth: 1,
            fault: None,
        });
        delivered += 1;
    }

    hook.on_run_end(&RunEnd {
        output: &[],
        gas_used: (delivered as u64 * 3).min(1_000_000),
        fault: None,
    });
    hook.on_tx_end(1_000_000_u64.saturating_sub(delivered as u64 * 3));
    delivered
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Run to completion.
    let mut hook = Opcount::default();
    let delivered = drive(&mut hook, PROGRAM.iter().copied());
    let result = hook.result()?;
    println!("completed run: {delivered} steps");
    println!("  counts: {}", result.counts.get());
    println!("  reason: {:?}", result.reason);

    // Run again over an endless loop of the same program, with a supervisor
    // thread cancelling shortly after the run starts.
    let mut hook = Opcount::default();
    let token = hook.cancel_token();
    let supervisor = thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        token.cancel("supervisor deadline");
    });

    let delivered = drive(&mut hook, PROGRAM.iter().copied().cycle());
    supervisor.join().expect("supervisor thread panicked");

    let result = hook.result()?;
    println!("cancelled run: {delivered} steps delivered before unwind");
    println!("  distinct kinds: {}", hook.tally().kinds());
    println!("  reason: {:?}", result.reason);

    Ok(())
}
