use crate::selector::Selector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page-scoped reference to a resolved DOM node.
///
/// Handles are minted by the page itself and die with it: after a navigation
/// any handle from the previous document fails with [`BackendError::StaleElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}

/// Visual marking applied to an element before it is acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: String,
    pub duration_ms: u64,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: "yellow".into(),
            duration_ms: 1500,
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend not ready")]
    NotReady,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Stale element reference: {0}")]
    StaleElement(ElementHandle),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// The Backend trait is the unified interface every browser driver implements.
///
/// It is the whole of what the interpreter needs from a live page: element
/// queries, activation, value assignment, location and synthetic keys.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, connect to a driver, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Current document location.
    async fn current_url(&mut self) -> Result<String, BackendError>;

    /// Navigate to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Evaluate a classified selector against the current document.
    ///
    /// Returns `Ok(None)` when nothing matches. Syntax errors in the selector
    /// expression surface as [`BackendError::InvalidSelector`].
    async fn query(&mut self, selector: &Selector) -> Result<Option<ElementHandle>, BackendError>;

    /// Invoke the element's default activation.
    async fn click(&mut self, element: ElementHandle) -> Result<(), BackendError>;

    async fn focus(&mut self, element: ElementHandle) -> Result<(), BackendError>;

    /// Assign `value` and fire a bubbling `input` event so listeners observe it.
    async fn set_value(&mut self, element: ElementHandle, value: &str)
    -> Result<(), BackendError>;

    /// Dispatch a synthetic keydown for `key` on the document.
    async fn dispatch_key(&mut self, key: &str) -> Result<(), BackendError>;

    /// Temporarily outline an element. Purely cosmetic; the restore happens in-page.
    async fn highlight(
        &mut self,
        _element: ElementHandle,
        _style: &HighlightStyle,
    ) -> Result<(), BackendError> {
        Ok(())
    }
}
