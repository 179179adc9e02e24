//! Debounced single-flight execution of the rebuild action.
//!
//! Bursts of watcher events must collapse into at most one queued rebuild
//! beyond whichever rebuild is currently running. The gate is a small
//! explicit state machine behind one mutex; triggering never blocks the
//! caller, which keeps the watcher-consumption task responsive while a
//! build is in flight.

use parking_lot::Mutex;
use std::sync::Arc;

/// Gate state.
///
/// `RunningWithPending` absorbs any number of extra triggers; they coalesce
/// into a single follow-up run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Idle,
    Running,
    RunningWithPending,
}

/// Single-flight gate with one coalesced pending slot.
#[derive(Debug)]
pub struct ReloadGate {
    state: Mutex<GateState>,
}

impl ReloadGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Non-blocking acquisition attempt.
    ///
    /// Returns true if the caller now owns the gate and must run the action.
    /// A losing caller has its trigger recorded as pending instead.
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            GateState::Idle => {
                *state = GateState::Running;
                true
            }
            GateState::Running => {
                *state = GateState::RunningWithPending;
                false
            }
            GateState::RunningWithPending => false,
        }
    }

    /// Mark one run as finished.
    ///
    /// Returns true if a trigger arrived during the run and the owner must
    /// run again. Ownership is only released when this returns false.
    fn finish_run(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            GateState::RunningWithPending => {
                *state = GateState::Running;
                true
            }
            _ => {
                *state = GateState::Idle;
                false
            }
        }
    }

    /// Run `f` under the gate, synchronously in the calling thread.
    ///
    /// If another run is in flight this returns immediately after recording
    /// a pending trigger. The owning caller keeps running `f` until no
    /// pending trigger remains, so the last trigger is never dropped.
    pub fn run<F: FnMut()>(&self, mut f: F) {
        if !self.try_acquire() {
            return;
        }
        loop {
            f();
            if !self.finish_run() {
                break;
            }
        }
    }
}

impl Default for ReloadGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Gated rebuild trigger for use from async tasks.
///
/// `trigger` never suspends or blocks the caller: when the gate is acquired
/// the run loop is moved onto the blocking thread pool, where the rebuild
/// subprocesses are free to take as long as they need.
pub struct Reloader<F> {
    gate: Arc<ReloadGate>,
    action: Arc<F>,
}

impl<F> Reloader<F>
where
    F: Fn() + Send + Sync + 'static,
{
    /// Wrap a rebuild action.
    ///
    /// The action is the error boundary: it must handle (log) its own
    /// failures, nothing is propagated out of the gate.
    pub fn new(action: F) -> Self {
        Self {
            gate: Arc::new(ReloadGate::new()),
            action: Arc::new(action),
        }
    }

    /// Request a rebuild.
    pub fn trigger(&self) {
        if !self.gate.try_acquire() {
            return;
        }
        let gate = Arc::clone(&self.gate);
        let action = Arc::clone(&self.action);
        tokio::task::spawn_blocking(move || loop {
            action();
            if !gate.finish_run() {
                break;
            }
        });
    }
}
