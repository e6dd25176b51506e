//! Config file loading and validation.

use slirc_wordguard::config::{Config, ConfigError, LogFormat};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_validated_config() {
    let file = write_config(
        r##"
[bot]
nick = "guard"

[database]
path = ":memory:"

[channels]
log_channels = ["#foo"]
other_channels = ["#bar", "#foo"]

[logging]
format = "json"
"##,
    );

    let config = Config::load_validated(file.path()).unwrap();
    assert_eq!(config.bot.nick, "guard");
    assert_eq!(config.channels.monitored(), vec!["foo", "bar"]);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_invalid_config_reports_all_errors() {
    let file = write_config(
        r##"
[bot]
command_prefix = ""

[database]
path = ":memory:"

[moderation]
notice_template = "no placeholder"
"##,
    );

    match Config::load_validated(file.path()) {
        Err(ConfigError::Invalid(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let file = write_config("[bot\nnick = ");
    assert!(matches!(
        Config::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}
