use crate::backend::{Backend, BackendError, ElementHandle};
use crate::selector;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Timeout: element not found: {selector} (waited {elapsed:?})")]
    NotFound { selector: String, elapsed: Duration },

    #[error("Selector '{selector}' could not be evaluated: {source}")]
    Resolve {
        selector: String,
        #[source]
        source: BackendError,
    },
}

impl WaitError {
    pub fn selector(&self) -> &str {
        match self {
            WaitError::NotFound { selector, .. } | WaitError::Resolve { selector, .. } => selector,
        }
    }
}

/// Poll for `raw` until it resolves or `options.timeout` elapses.
///
/// The first query happens immediately. Each miss sleeps for one interval,
/// yielding to the runtime. A backend error (malformed selector, broken page
/// context) fails the wait at once instead of burning the remaining timeout.
pub async fn wait_for_element<B: Backend + ?Sized>(
    backend: &mut B,
    raw: &str,
    options: &WaitOptions,
) -> Result<ElementHandle, WaitError> {
    let started = Instant::now();

    while started.elapsed() < options.timeout {
        match selector::resolve(backend, raw).await {
            Ok(Some(element)) => return Ok(element),
            Ok(None) => {}
            Err(source) => {
                return Err(WaitError::Resolve {
                    selector: raw.to_string(),
                    source,
                });
            }
        }
        debug!("Selector {} not found yet, polling again", raw);
        tokio::time::sleep(options.interval).await;
    }

    Err(WaitError::NotFound {
        selector: raw.to_string(),
        elapsed: started.elapsed(),
    })
}
