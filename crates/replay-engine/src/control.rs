//! Pause / resume / cancel signalling between a control surface and a running interpreter.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    /// An `open` left the page; commands after it were dropped.
    Navigating { url: String },
    Cancelled,
    Completed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Navigating { .. } | RunState::Cancelled | RunState::Completed
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Running => f.write_str("running"),
            RunState::Paused => f.write_str("paused"),
            RunState::Navigating { url } => write!(f, "navigating to {}", url),
            RunState::Cancelled => f.write_str("cancelled"),
            RunState::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    Proceed,
    Pause,
    Cancel,
}

/// Sending half. Cheap to clone; every clone drives the same run.
#[derive(Debug, Clone)]
pub struct RunControl {
    tx: Arc<watch::Sender<RunSignal>>,
}

/// Receiving half, held by the interpreter.
#[derive(Debug)]
pub struct RunSignals {
    rx: watch::Receiver<RunSignal>,
}

pub fn channel() -> (RunControl, RunSignals) {
    let (tx, rx) = watch::channel(RunSignal::Proceed);
    (RunControl { tx: Arc::new(tx) }, RunSignals { rx })
}

impl RunControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunSignal::Proceed);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> RunSignals {
        RunSignals {
            rx: self.tx.subscribe(),
        }
    }

    pub fn signal(&self) -> RunSignal {
        *self.tx.borrow()
    }

    /// Request a pause at the next command boundary. No effect once cancelled.
    pub fn pause(&self) -> bool {
        self.tx.send_if_modified(|s| {
            if *s == RunSignal::Proceed {
                *s = RunSignal::Pause;
                true
            } else {
                false
            }
        })
    }

    pub fn resume(&self) -> bool {
        self.tx.send_if_modified(|s| {
            if *s == RunSignal::Pause {
                *s = RunSignal::Proceed;
                true
            } else {
                false
            }
        })
    }

    pub fn cancel(&self) {
        self.tx.send_replace(RunSignal::Cancel);
    }

    /// Clear any pending signal before a new run starts.
    pub fn reset(&self) {
        self.tx.send_replace(RunSignal::Proceed);
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSignals {
    pub fn current(&self) -> RunSignal {
        *self.rx.borrow()
    }

    /// Suspend while the signal is `Pause`. Returns the signal that ended the wait.
    ///
    /// If every [`RunControl`] is dropped while paused nobody can resume,
    /// so that counts as a cancel.
    pub async fn wait_while_paused(&mut self) -> RunSignal {
        loop {
            let signal = *self.rx.borrow_and_update();
            if signal != RunSignal::Pause {
                return signal;
            }
            if self.rx.changed().await.is_err() {
                return RunSignal::Cancel;
            }
        }
    }
}
