/*!
 * Tests for application configuration
 */

use anyhow::Result;
use substream::app_config::{Config, LogLevel};

use crate::common;

/// Test default values
#[test]
fn test_default_withNoFile_shouldUseDocumentedDefaults() {
    let config = Config::default();
    assert_eq!(config.default_encoding, None);
    assert_eq!(config.sync_tolerance, 0.05);
    assert_eq!(config.chunk_size, 1024 * 1024);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a missing config file falls back to defaults
#[test]
fn test_from_file_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let config = Config::from_file("does_not_exist.json")?;
    assert_eq!(config.sync_tolerance, 0.05);
    Ok(())
}

/// Test loading a partial config file with field defaults filling in
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "sync_tolerance": 0.1, "log_level": "debug" }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.sync_tolerance, 0.1);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.chunk_size, 1024 * 1024);
    Ok(())
}

/// Test save and reload round-trip
#[test]
fn test_save_thenLoad_shouldRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.sync_tolerance = 0.2;
    config.default_encoding = Some("windows-1252".to_string());
    config.save(&path)?;

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded.sync_tolerance, 0.2);
    assert_eq!(reloaded.default_encoding.as_deref(), Some("windows-1252"));
    Ok(())
}

/// Test validation failures
#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.sync_tolerance = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.chunk_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.default_encoding = Some("not-a-charset".to_string());
    assert!(config.validate().is_err());
}
