use replay_engine::script::{Script, ScriptError};
use std::io::Write;

const RECORDED: &str = r#"{
  "Name": "eta9035",
  "CreationDate": "2024-5-14",
  "Commands": [
    {
      "Command": "open",
      "Target": "https://forms.example.com/eta",
      "Value": "",
      "Targets": [],
      "Description": ""
    },
    {
      "Command": "click",
      "Target": "xpath=//*[@id=\"start\"]",
      "Value": "",
      "Targets": [
        "xpath=//*[@id=\"start\"]",
        "css=#start",
        "linkText=Start"
      ],
      "Description": "begin"
    },
    {
      "Command": "type",
      "Target": "id=surname",
      "Value": "${surname}"
    },
    { "Command": "end" }
  ]
}"#;

#[test]
fn test_parses_recorded_script() {
    let script = Script::from_json(RECORDED).unwrap();

    assert_eq!(script.name.as_deref(), Some("eta9035"));
    assert_eq!(script.len(), 4);

    let click = &script.commands[1];
    assert_eq!(click.command, "click");
    assert_eq!(click.target.as_deref(), Some("xpath=//*[@id=\"start\"]"));
    assert_eq!(
        click.targets,
        vec!["xpath=//*[@id=\"start\"]", "css=#start", "linkText=Start"]
    );
    assert_eq!(click.description.as_deref(), Some("begin"));

    let end = &script.commands[3];
    assert!(end.target.is_none());
    assert!(end.value.is_none());
    assert!(end.targets.is_empty());
}

#[test]
fn test_labelled_targets_keep_only_the_selector() {
    let script = Script::from_json(
        r#"{"Commands":[{"Command":"click","Target":"css=#a",
            "Targets":[["css=#a","css:finder"],["xpath=//a","xpath:position"],"linkText=A"]}]}"#,
    )
    .unwrap();

    assert_eq!(
        script.commands[0].targets,
        vec!["css=#a", "xpath=//a", "linkText=A"]
    );
}

#[test]
fn test_null_targets_are_empty() {
    let script =
        Script::from_json(r#"{"Commands":[{"Command":"click","Targets":null}]}"#).unwrap();
    assert!(script.commands[0].targets.is_empty());
}

#[test]
fn test_missing_commands_is_a_parse_failure() {
    let err = Script::from_json(r#"{"Name":"empty"}"#).unwrap_err();
    assert!(matches!(err, ScriptError::Parse(_)));
}

#[test]
fn test_invalid_json_is_a_parse_failure() {
    let err = Script::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ScriptError::Parse(_)));
    assert!(err.to_string().starts_with("Failed to parse script"));
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RECORDED.as_bytes()).unwrap();

    let script = Script::load(file.path()).await.unwrap();
    assert_eq!(script.len(), 4);
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Script::load(&dir.path().join("nope.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScriptError::Io(_)));
}
