use replay_engine::config::{ConfigLoader, ReplayConfig};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ReplayConfig::default();
    assert_eq!(config.timing.command_delay_ms, 800);
    assert_eq!(config.timing.wait_timeout_ms, 5000);
    assert_eq!(config.timing.poll_interval_ms, 300);
    assert!(config.highlight.enabled);
    assert_eq!(config.highlight.color, "yellow");
    assert_eq!(config.highlight.duration_ms, 1500);
    assert_eq!(config.keys.command, "XType");
    assert_eq!(config.keys.escape_token, "${KEY_ESC}");
    assert!(!config.navigation.continue_after_open);
    assert!(config.logging.mask_sensitive);
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let config = ConfigLoader::parse(
        r##"
timing:
  wait_timeout_ms: 10000
highlight:
  color: "#ff00aa"
navigation:
  continue_after_open: true
"##,
    )
    .unwrap();

    assert_eq!(config.timing.wait_timeout_ms, 10000);
    assert_eq!(config.timing.poll_interval_ms, 300);
    assert_eq!(config.highlight.color, "#ff00aa");
    assert!(config.highlight.enabled);
    assert!(config.navigation.continue_after_open);
    assert_eq!(config.keys.command, "XType");
}

#[test]
fn test_empty_file_is_default() {
    assert_eq!(ConfigLoader::parse("  \n").unwrap(), ReplayConfig::default());
}

#[test]
fn test_invalid_yaml_is_an_error() {
    assert!(ConfigLoader::parse("timing: [1, 2").is_err());
}

#[test]
fn test_wait_options_from_timing() {
    let config = ConfigLoader::parse("timing: { wait_timeout_ms: 2000, poll_interval_ms: 50 }")
        .unwrap();
    let options = config.timing.wait_options();
    assert_eq!(options.timeout, Duration::from_millis(2000));
    assert_eq!(options.interval, Duration::from_millis(50));
    assert_eq!(config.timing.command_delay(), Duration::from_millis(800));
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "keys:\n  command: sendKeys").unwrap();

    let config = ConfigLoader::load(Some(file.path())).await.unwrap();
    assert_eq!(config.keys.command, "sendKeys");
    assert_eq!(config.keys.escape_token, "${KEY_ESC}");
}
