//! Run-scoped variable store and `${name}` / `${!name}` placeholder substitution.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(!?)([A-Za-z0-9_]+)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Text(String),
}

impl VarValue {
    /// Empty text and `false` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            VarValue::Bool(b) => *b,
            VarValue::Text(s) => !s.is_empty(),
        }
    }
}

impl std::fmt::Display for VarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarValue::Bool(b) => write!(f, "{}", b),
            VarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Text(s)
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Text(s.to_string())
    }
}

/// Variables owned by a single run. Created empty, discarded with the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    values: BTreeMap<String, VarValue>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VarValue)> {
        self.values.iter()
    }

    /// Substitute placeholders in `template` against this store.
    pub fn substitute(&self, template: Option<&str>) -> String {
        substitute(template, self)
    }
}

/// Replace every `${name}` with the stored value (empty when unset) and every
/// `${!name}` with the negated truthiness of the stored value.
///
/// Single pass, left to right: substituted text is never rescanned.
/// An absent template yields an empty string.
pub fn substitute(template: Option<&str>, variables: &VariableStore) -> String {
    let Some(template) = template else {
        return String::new();
    };

    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let negate = !caps[1].is_empty();
            let stored = variables.get(&caps[2]);
            if negate {
                let truthy = stored.is_some_and(VarValue::is_truthy);
                (!truthy).to_string()
            } else {
                stored.map(VarValue::to_string).unwrap_or_default()
            }
        })
        .into_owned()
}
