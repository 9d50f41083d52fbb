//! Selector classification and resolution.
//!
//! Selectors are authored as prefixed strings (`xpath=`, `css=`, `linkText=`).
//! A string with no recognised prefix is treated as XPath.

use crate::backend::{Backend, BackendError, ElementHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    #[serde(rename = "xpath")]
    XPath,
    Css,
    LinkText,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::XPath => "xpath",
            SelectorKind::Css => "css",
            SelectorKind::LinkText => "link_text",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            SelectorKind::XPath => "xpath=",
            SelectorKind::Css => "css=",
            SelectorKind::LinkText => "linkText=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    pub kind: SelectorKind,
    pub value: String,
}

impl Selector {
    pub fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Classify a raw selector string by its prefix.
    pub fn parse(raw: &str) -> Self {
        for kind in [SelectorKind::XPath, SelectorKind::Css, SelectorKind::LinkText] {
            if let Some(rest) = raw.strip_prefix(kind.prefix()) {
                return Self::new(kind, rest);
            }
        }
        Self::new(SelectorKind::XPath, raw)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.value)
    }
}

/// Classify `raw` and evaluate it once against the backend's current document.
pub async fn resolve<B: Backend + ?Sized>(
    backend: &mut B,
    raw: &str,
) -> Result<Option<ElementHandle>, BackendError> {
    let selector = Selector::parse(raw);
    backend.query(&selector).await
}
