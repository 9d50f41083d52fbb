use replay_engine::backend::{BackendError, ElementHandle, HighlightStyle};
use replay_engine::selector::Selector;
use serde::{Deserialize, Serialize};

/// One call into `window.__replayBridge.process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeRequest {
    /// `kind` is one of `xpath`, `css`, `link_text`.
    Query { kind: String, value: String },
    Click { handle: u64 },
    Focus { handle: u64 },
    SetValue { handle: u64, value: String },
    DispatchKey { key: String },
    Highlight {
        handle: u64,
        color: String,
        duration_ms: u64,
    },
}

impl BridgeRequest {
    pub fn query(selector: &Selector) -> Self {
        BridgeRequest::Query {
            kind: selector.kind.as_str().to_string(),
            value: selector.value.clone(),
        }
    }

    pub fn highlight(element: ElementHandle, style: &HighlightStyle) -> Self {
        BridgeRequest::Highlight {
            handle: element.0,
            color: style.color.clone(),
            duration_ms: style.duration_ms,
        }
    }

    /// The element this request acts on, if any.
    pub fn handle(&self) -> Option<ElementHandle> {
        match self {
            BridgeRequest::Click { handle }
            | BridgeRequest::Focus { handle }
            | BridgeRequest::SetValue { handle, .. }
            | BridgeRequest::Highlight { handle, .. } => Some(ElementHandle(*handle)),
            BridgeRequest::Query { .. } | BridgeRequest::DispatchKey { .. } => None,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            BridgeRequest::Query { .. } => "query",
            BridgeRequest::Click { .. } => "click",
            BridgeRequest::Focus { .. } => "focus",
            BridgeRequest::SetValue { .. } => "set_value",
            BridgeRequest::DispatchKey { .. } => "dispatch_key",
            BridgeRequest::Highlight { .. } => "highlight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeErrorKind {
    /// The selector expression could not be parsed.
    InvalidSelector,
    /// The handle does not belong to the current document.
    Stale,
    /// Anything else thrown in-page.
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BridgeResponse {
    Ok {
        #[serde(default)]
        handle: Option<u64>,
    },
    Error {
        kind: BridgeErrorKind,
        #[serde(default)]
        message: String,
    },
}

impl BridgeResponse {
    /// Parse the raw value returned by the page.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Map the page's answer to `request` onto the backend contract.
    pub fn into_result(
        self,
        request: &BridgeRequest,
    ) -> Result<Option<ElementHandle>, BackendError> {
        match self {
            BridgeResponse::Ok { handle } => Ok(handle.map(ElementHandle)),
            BridgeResponse::Error { kind, message } => Err(match kind {
                BridgeErrorKind::InvalidSelector => BackendError::InvalidSelector(message),
                BridgeErrorKind::Stale => match request.handle() {
                    Some(element) => BackendError::StaleElement(element),
                    None => BackendError::Bridge(message),
                },
                BridgeErrorKind::Script => {
                    BackendError::Script(format!("{} failed: {}", request.op(), message))
                }
            }),
        }
    }
}
