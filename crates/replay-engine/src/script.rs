//! Recorded scripts: the JSON document with a top-level `Commands` list.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "CreationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<String>,
    #[serde(rename = "Commands")]
    pub commands: Vec<CommandRecord>,
}

/// One recorded step as authored. Placeholders are left unsubstituted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Target", default)]
    pub target: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
    #[serde(
        rename = "Targets",
        default,
        deserialize_with = "deserialize_targets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub targets: Vec<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn fallback(mut self, selector: impl Into<String>) -> Self {
        self.targets.push(selector.into());
        self
    }
}

/// A `Targets` entry: either `"css=..."` or `["css=...", "css:finder"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetEntry {
    Plain(String),
    Labelled(String, IgnoredAny),
}

fn deserialize_targets<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<TargetEntry>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            TargetEntry::Plain(selector) | TargetEntry::Labelled(selector, _) => selector,
        })
        .collect())
}

impl Script {
    pub fn new(commands: Vec<CommandRecord>) -> Self {
        Self {
            name: None,
            creation_date: None,
            commands,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(content)?)
    }

    pub async fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
