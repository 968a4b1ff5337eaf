/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use anyhow::Result;
use subtext::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.ffmpeg_path, "ffmpeg");
    assert_eq!(config.output_dir, PathBuf::from("."));
    assert_eq!(config.text_extension, "txt");
    assert_eq!(config.caption_extension, "srt");
    assert_eq!(config.subtitle_stream, "0:s:0");
    assert_eq!(config.tool_timeout_secs, 120);
    assert!(!config.keep_caption_file);
    assert!(config.overwrite);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.ffmpeg_path = "  ".to_string();
    assert!(config.validate().is_err());
    config.ffmpeg_path = "/usr/bin/ffmpeg".to_string();
    assert!(config.validate().is_ok());

    config.caption_extension = String::new();
    assert!(config.validate().is_err());
    config.caption_extension = "s/rt".to_string();
    assert!(config.validate().is_err());
    config.caption_extension = "srt".to_string();

    config.subtitle_stream = String::new();
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.text_extension, "txt");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.subtitle_stream, config.subtitle_stream);
    Ok(())
}

/// Test that saved values survive a reload
#[test]
fn test_save_and_load_withCustomValues_shouldPersist() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let config = Config {
        text_extension: "md".to_string(),
        keep_caption_file: true,
        log_level: LogLevel::Trace,
        ..Config::default()
    };
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.text_extension, "md");
    assert!(loaded.keep_caption_file);
    assert_eq!(loaded.log_level, LogLevel::Trace);
    Ok(())
}

/// Test that broken JSON is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
}
