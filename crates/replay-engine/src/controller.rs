use crate::backend::Backend;
use crate::config::ReplayConfig;
use crate::control::RunControl;
use crate::diagnostics::Diagnostics;
use crate::executor::{Interpreter, RunReport};
use crate::script::Script;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("A run is already in progress")]
    AlreadyRunning,
}

type StartCallback = Box<dyn Fn(&Script) + Send + Sync>;

/// Owns the run lifecycle for one page: the start trigger plus pause/resume/stop.
///
/// Only one run may be in flight at a time.
pub struct Controller {
    config: ReplayConfig,
    control: RunControl,
    diagnostics: Diagnostics,
    running: Arc<AtomicBool>,
    on_start: Option<StartCallback>,
}

struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Controller {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            control: RunControl::new(),
            diagnostics: Diagnostics::new(),
            running: Arc::new(AtomicBool::new(false)),
            on_start: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Invoked with the script each time a run begins.
    pub fn on_start(mut self, callback: impl Fn(&Script) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Handle for pausing, resuming or stopping the active run from elsewhere.
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn start<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        script: &Script,
    ) -> Result<RunReport, ControllerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::AlreadyRunning);
        }
        let _guard = RunningGuard(self.running.clone());

        self.control.reset();
        if let Some(callback) = &self.on_start {
            callback(script);
        }

        let mut interpreter = Interpreter::new(self.config.clone(), self.control.subscribe())
            .with_diagnostics(self.diagnostics.clone());
        Ok(interpreter.run(backend, script).await)
    }

    pub fn pause(&self) -> bool {
        self.control.pause()
    }

    pub fn resume(&self) -> bool {
        self.control.resume()
    }

    pub fn stop(&self) {
        self.control.cancel();
    }
}
