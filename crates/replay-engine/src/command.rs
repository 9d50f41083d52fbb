use crate::config::KeysConfig;
use crate::script::CommandRecord;

/// A recorded step lifted into one variant per supported action.
///
/// Fields stay as authored; placeholders are substituted when the command runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `variables[value] = target`
    Store {
        target: Option<String>,
        name: Option<String>,
    },
    Open {
        url: Option<String>,
    },
    Click {
        target: Option<String>,
        fallbacks: Vec<String>,
    },
    Type {
        target: Option<String>,
        fallbacks: Vec<String>,
        text: Option<String>,
    },
    VerifyElementPresent {
        target: Option<String>,
        fallbacks: Vec<String>,
        name: Option<String>,
    },
    End,
    /// Custom key command. Only the escape token does anything.
    KeyPress {
        value: Option<String>,
    },
    Unrecognized(String),
}

impl Command {
    pub fn from_record(record: &CommandRecord, keys: &KeysConfig) -> Self {
        let target = record.target.clone();
        let value = record.value.clone();
        let fallbacks = record.targets.clone();

        match record.command.as_str() {
            "store" => Command::Store {
                target,
                name: value,
            },
            "open" => Command::Open { url: target },
            "click" => Command::Click { target, fallbacks },
            "type" => Command::Type {
                target,
                fallbacks,
                text: value,
            },
            "verifyElementPresent" => Command::VerifyElementPresent {
                target,
                fallbacks,
                name: value,
            },
            "end" => Command::End,
            kind if kind == keys.command => Command::KeyPress { value },
            other => Command::Unrecognized(other.to_string()),
        }
    }

    /// The authored field substituted into the logged target.
    pub fn authored_target(&self) -> Option<&str> {
        match self {
            Command::Store { target, .. }
            | Command::Click { target, .. }
            | Command::Type { target, .. }
            | Command::VerifyElementPresent { target, .. } => target.as_deref(),
            Command::Open { url } => url.as_deref(),
            Command::End | Command::KeyPress { .. } | Command::Unrecognized(_) => None,
        }
    }

    /// The authored field substituted into the logged value.
    pub fn authored_value(&self) -> Option<&str> {
        match self {
            Command::Store { name, .. } | Command::VerifyElementPresent { name, .. } => {
                name.as_deref()
            }
            Command::Type { text, .. } => text.as_deref(),
            Command::KeyPress { value } => value.as_deref(),
            Command::Open { .. } | Command::Click { .. } | Command::End | Command::Unrecognized(_) => {
                None
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Store { .. } => "store",
            Command::Open { .. } => "open",
            Command::Click { .. } => "click",
            Command::Type { .. } => "type",
            Command::VerifyElementPresent { .. } => "verifyElementPresent",
            Command::End => "end",
            Command::KeyPress { .. } => "keyPress",
            Command::Unrecognized(kind) => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_kinds() {
        let keys = KeysConfig::default();
        let store = CommandRecord::new("store").target("hello").value("greeting");
        assert_eq!(
            Command::from_record(&store, &keys),
            Command::Store {
                target: Some("hello".into()),
                name: Some("greeting".into())
            }
        );

        let click = CommandRecord::new("click")
            .target("css=#go")
            .fallback("linkText=Go");
        assert_eq!(
            Command::from_record(&click, &keys),
            Command::Click {
                target: Some("css=#go".into()),
                fallbacks: vec!["linkText=Go".into()]
            }
        );

        assert_eq!(
            Command::from_record(&CommandRecord::new("end"), &keys),
            Command::End
        );
    }

    #[test]
    fn custom_key_command_name_comes_from_config() {
        let keys = KeysConfig {
            command: "sendKey".into(),
            ..Default::default()
        };
        let record = CommandRecord::new("sendKey").value("${KEY_ESC}");
        assert!(matches!(
            Command::from_record(&record, &keys),
            Command::KeyPress { .. }
        ));
        assert_eq!(
            Command::from_record(&CommandRecord::new("XType"), &keys),
            Command::Unrecognized("XType".into())
        );
    }

    #[test]
    fn kinds_are_case_sensitive() {
        let keys = KeysConfig::default();
        assert_eq!(
            Command::from_record(&CommandRecord::new("Click"), &keys),
            Command::Unrecognized("Click".into())
        );
    }
}
