//! Command interpreter shared by all replay drivers.
//!
//! A run drains the script's command queue one command at a time:
//! checkpoint (pause/cancel) → substitute → dispatch → fixed delay.
//! Locator failures abandon the current command and the queue moves on;
//! only an `open` that leaves the page or a cancel ends a run early.

use crate::backend::{Backend, ElementHandle};
use crate::command::Command;
use crate::config::ReplayConfig;
use crate::control::{self, RunSignal, RunSignals, RunState};
use crate::diagnostics::{Diagnostics, RunEvent};
use crate::formatter::mask_sensitive;
use crate::location::{resolve_location, same_location};
use crate::locator::{self, Located, NoValidTarget};
use crate::script::Script;
use crate::variables::{VarValue, VariableStore};
use std::collections::VecDeque;
use tracing::{debug, warn};

const ESCAPE_KEY: &str = "Escape";

/// Summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub state: RunState,
    pub dispatched: usize,
    pub succeeded: usize,
    pub abandoned: usize,
    /// Commands that were dispatched but had nothing to do (`end`, unknown kinds).
    pub skipped: usize,
    /// Commands never dispatched because the run ended first.
    pub remaining: usize,
    pub variables: VariableStore,
}

enum Outcome {
    Completed,
    NoOp,
    Abandoned(String),
    Navigated(String),
}

pub struct Interpreter {
    config: ReplayConfig,
    signals: RunSignals,
    diagnostics: Diagnostics,
}

impl Interpreter {
    pub fn new(config: ReplayConfig, signals: RunSignals) -> Self {
        Self {
            config,
            signals,
            diagnostics: Diagnostics::new(),
        }
    }

    /// An interpreter nobody can pause or cancel.
    pub fn standalone(config: ReplayConfig) -> Self {
        let (_control, signals) = control::channel();
        Self::new(config, signals)
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Execute `script` against `backend` with a fresh variable store.
    pub async fn run<B: Backend + ?Sized>(&mut self, backend: &mut B, script: &Script) -> RunReport {
        let mut queue: VecDeque<(usize, Command)> = script
            .commands
            .iter()
            .map(|record| Command::from_record(record, &self.config.keys))
            .enumerate()
            .collect();

        let mut variables = VariableStore::new();
        let mut dispatched = 0;
        let mut succeeded = 0;
        let mut abandoned = 0;
        let mut skipped = 0;

        self.diagnostics.emit(RunEvent::RunStarted {
            commands: queue.len(),
        });

        let state = loop {
            let Some(&(index, _)) = queue.front() else {
                break RunState::Completed;
            };

            if self.checkpoint(index).await == RunSignal::Cancel {
                break RunState::Cancelled;
            }

            let Some((index, command)) = queue.pop_front() else {
                break RunState::Completed;
            };
            dispatched += 1;

            match self
                .execute(backend, index, &command, &mut variables)
                .await
            {
                Outcome::Completed => {
                    succeeded += 1;
                    self.diagnostics.emit(RunEvent::CommandCompleted {
                        index,
                        command: command.name().to_string(),
                    });
                }
                Outcome::NoOp => {
                    skipped += 1;
                    debug!("[{}] {} had nothing to do", index, command.name());
                }
                Outcome::Abandoned(reason) => {
                    abandoned += 1;
                    self.diagnostics.emit(RunEvent::CommandAbandoned {
                        index,
                        command: command.name().to_string(),
                        reason,
                    });
                }
                Outcome::Navigated(url) => {
                    succeeded += 1;
                    if !self.config.navigation.continue_after_open {
                        self.diagnostics.emit(RunEvent::Navigating {
                            url: url.clone(),
                            dropped: queue.len(),
                        });
                        break RunState::Navigating { url };
                    }
                    self.diagnostics.emit(RunEvent::CommandCompleted {
                        index,
                        command: command.name().to_string(),
                    });
                }
            }

            tokio::time::sleep(self.config.timing.command_delay()).await;
        };

        self.diagnostics.emit(RunEvent::RunFinished {
            state: state.clone(),
            dispatched,
        });

        RunReport {
            state,
            dispatched,
            succeeded,
            abandoned,
            skipped,
            remaining: queue.len(),
            variables,
        }
    }

    /// Honour pause/cancel before command `index` starts.
    async fn checkpoint(&mut self, index: usize) -> RunSignal {
        match self.signals.current() {
            RunSignal::Pause => {
                self.diagnostics.emit(RunEvent::Paused { index });
                let signal = self.signals.wait_while_paused().await;
                if signal != RunSignal::Cancel {
                    self.diagnostics.emit(RunEvent::Resumed { index });
                }
                signal
            }
            signal => signal,
        }
    }

    async fn execute<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        index: usize,
        command: &Command,
        variables: &mut VariableStore,
    ) -> Outcome {
        let target = variables.substitute(command.authored_target());
        let value = variables.substitute(command.authored_value());

        let (logged_target, logged_value) = match command {
            // The literal being stored is the secret; its name is the hint.
            Command::Store { .. } => (self.mask(&value, &target), value.clone()),
            _ => (target.clone(), self.mask(&target, &value)),
        };
        self.diagnostics.emit(RunEvent::CommandStarted {
            index,
            command: command.name().to_string(),
            target: logged_target,
            value: logged_value,
        });

        match command {
            Command::Store { .. } => {
                self.store(variables, value, target.as_str());
                Outcome::Completed
            }

            Command::Open { .. } => self.open(backend, &target).await,

            Command::Click {
                target: primary,
                fallbacks,
            } => {
                let located = match self
                    .locate(backend, index, primary.as_deref(), fallbacks, variables)
                    .await
                {
                    Ok(located) => located,
                    Err(e) => return Outcome::Abandoned(e.to_string()),
                };
                self.highlight(backend, located.element).await;
                match backend.click(located.element).await {
                    Ok(()) => Outcome::Completed,
                    Err(e) => Outcome::Abandoned(format!("click failed: {}", e)),
                }
            }

            Command::Type {
                target: primary,
                fallbacks,
                ..
            } => {
                let located = match self
                    .locate(backend, index, primary.as_deref(), fallbacks, variables)
                    .await
                {
                    Ok(located) => located,
                    Err(e) => return Outcome::Abandoned(e.to_string()),
                };
                self.highlight(backend, located.element).await;
                if let Err(e) = backend.focus(located.element).await {
                    return Outcome::Abandoned(format!("focus failed: {}", e));
                }
                match backend.set_value(located.element, &value).await {
                    Ok(()) => Outcome::Completed,
                    Err(e) => Outcome::Abandoned(format!("setting value failed: {}", e)),
                }
            }

            Command::VerifyElementPresent {
                target: primary,
                fallbacks,
                ..
            } => {
                let present = match self
                    .locate(backend, index, primary.as_deref(), fallbacks, variables)
                    .await
                {
                    Ok(located) => {
                        self.highlight(backend, located.element).await;
                        true
                    }
                    Err(_) => false,
                };
                self.store(variables, value, present);
                Outcome::Completed
            }

            Command::End => Outcome::NoOp,

            Command::KeyPress { value: authored } => {
                // Compared before substitution: `${KEY_ESC}` would otherwise become "".
                if authored.as_deref() != Some(self.config.keys.escape_token.as_str()) {
                    return Outcome::NoOp;
                }
                match backend.dispatch_key(ESCAPE_KEY).await {
                    Ok(()) => Outcome::Completed,
                    Err(e) => Outcome::Abandoned(format!("key dispatch failed: {}", e)),
                }
            }

            Command::Unrecognized(kind) => {
                debug!("Ignoring unrecognized command '{}'", kind);
                Outcome::NoOp
            }
        }
    }

    fn store(
        &self,
        variables: &mut VariableStore,
        name: String,
        value: impl Into<VarValue>,
    ) {
        let value = value.into();
        self.diagnostics.emit(RunEvent::VariableStored {
            name: name.clone(),
            value: self.mask(&name, &value.to_string()),
        });
        variables.set(name, value);
    }

    async fn open<B: Backend + ?Sized>(&self, backend: &mut B, target: &str) -> Outcome {
        let current = match backend.current_url().await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Could not read current location: {}", e);
                None
            }
        };

        // An empty target reloads the current page, which still ends the run.
        if target.is_empty() {
            let Some(current) = current else {
                warn!("open without a target and no current location to reload");
                return Outcome::NoOp;
            };
            if let Err(e) = backend.navigate(&current).await {
                warn!("Reload of {} failed: {}", current, e);
            }
            return Outcome::Navigated(current);
        }

        let destination = resolve_location(current.as_deref(), target);
        if let Some(current) = &current
            && same_location(current, &destination)
        {
            debug!("Already at {}", destination);
            return Outcome::Completed;
        }

        if let Err(e) = backend.navigate(&destination).await {
            warn!("Navigation to {} failed: {}", destination, e);
        }
        Outcome::Navigated(destination)
    }

    async fn locate<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        index: usize,
        primary: Option<&str>,
        fallbacks: &[String],
        variables: &VariableStore,
    ) -> Result<Located, NoValidTarget> {
        let options = self.config.timing.wait_options();
        let result = locator::locate(backend, primary, fallbacks, variables, &options).await;

        let failures = match &result {
            Ok(located) => &located.failures,
            Err(e) => &e.failures,
        };
        for failure in failures {
            self.diagnostics.emit(RunEvent::SelectorFailed {
                index,
                selector: failure.selector().to_string(),
                reason: failure.to_string(),
            });
        }

        result
    }

    async fn highlight<B: Backend + ?Sized>(&self, backend: &mut B, element: ElementHandle) {
        if !self.config.highlight.enabled {
            return;
        }
        if let Err(e) = backend
            .highlight(element, &self.config.highlight.style())
            .await
        {
            debug!("Highlight of {} failed: {}", element, e);
        }
    }

    fn mask(&self, hint: &str, value: &str) -> String {
        if self.config.logging.mask_sensitive {
            mask_sensitive(hint, value)
        } else {
            value.to_string()
        }
    }
}
