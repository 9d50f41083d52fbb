use crate::control::RunState;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Structured record of what a run did. Every event is also logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        commands: usize,
    },
    CommandStarted {
        index: usize,
        command: String,
        target: String,
        value: String,
    },
    SelectorFailed {
        index: usize,
        selector: String,
        reason: String,
    },
    CommandCompleted {
        index: usize,
        command: String,
    },
    CommandAbandoned {
        index: usize,
        command: String,
        reason: String,
    },
    VariableStored {
        name: String,
        value: String,
    },
    Paused {
        index: usize,
    },
    Resumed {
        index: usize,
    },
    Navigating {
        url: String,
        dropped: usize,
    },
    RunFinished {
        state: RunState,
        dispatched: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    sender: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl Diagnostics {
    /// Log-only diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics that also forward every event to the returned receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn emit(&self, event: RunEvent) {
        log_event(&event);
        if let Some(tx) = &self.sender {
            // A dropped receiver just means nobody is listening any more.
            let _ = tx.send(event);
        }
    }
}

fn log_event(event: &RunEvent) {
    match event {
        RunEvent::RunStarted { commands } => info!("Run started with {} commands", commands),
        RunEvent::CommandStarted {
            index,
            command,
            target,
            value,
        } => info!("[{}] Executing: {} → {} | {}", index, command, target, value),
        RunEvent::SelectorFailed {
            index,
            selector,
            reason,
        } => warn!("[{}] Selector failed: {} ({})", index, selector, reason),
        RunEvent::CommandCompleted { index, command } => debug!("[{}] {} done", index, command),
        RunEvent::CommandAbandoned {
            index,
            command,
            reason,
        } => error!("[{}] {} failed: {}", index, command, reason),
        RunEvent::VariableStored { name, value } => debug!("Stored {} = {}", name, value),
        RunEvent::Paused { index } => info!("Paused before command {}", index),
        RunEvent::Resumed { index } => info!("Resumed at command {}", index),
        RunEvent::Navigating { url, dropped } => info!(
            "Navigating to {}; {} remaining command(s) end with this page",
            url, dropped
        ),
        RunEvent::RunFinished { state, dispatched } => {
            info!("Run finished ({}) after {} command(s)", state, dispatched)
        }
    }
}
