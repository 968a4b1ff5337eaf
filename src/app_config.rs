use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path or name of the ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Directory the caption and text files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of the final plain text file (without the dot)
    #[serde(default = "default_text_extension")]
    pub text_extension: String,

    /// Extension of the intermediate caption file (without the dot)
    #[serde(default = "default_caption_extension")]
    pub caption_extension: String,

    /// ffmpeg stream specifier of the subtitle track to extract
    #[serde(default = "default_subtitle_stream")]
    pub subtitle_stream: String,

    /// Upper bound for a single ffmpeg invocation, in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Keep the intermediate caption file after conversion
    #[serde(default)]
    pub keep_caption_file: bool,

    /// Overwrite existing caption files instead of failing
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_text_extension() -> String {
    "txt".to_string()
}

fn default_caption_extension() -> String {
    "srt".to_string()
}

fn default_subtitle_stream() -> String {
    // First subtitle stream of the first input
    "0:s:0".to_string()
}

fn default_tool_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("ffmpeg_path must not be empty"));
        }

        for (field, value) in [
            ("text_extension", &self.text_extension),
            ("caption_extension", &self.caption_extension),
        ] {
            if value.is_empty() {
                return Err(anyhow!("{} must not be empty", field));
            }
            if value.contains('.') || value.contains('/') || value.contains('\\') {
                return Err(anyhow!("{} must be a bare extension without dots or separators: {}", field, value));
            }
        }

        if self.text_extension.eq_ignore_ascii_case(&self.caption_extension) {
            return Err(anyhow!(
                "text_extension and caption_extension must differ (both are '{}')",
                self.text_extension
            ));
        }

        if self.subtitle_stream.trim().is_empty() {
            return Err(anyhow!("subtitle_stream must not be empty"));
        }

        if self.tool_timeout_secs == 0 {
            return Err(anyhow!("tool_timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    /// Load the configuration from `path`, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            ffmpeg_path: default_ffmpeg_path(),
            output_dir: default_output_dir(),
            text_extension: default_text_extension(),
            caption_extension: default_caption_extension(),
            subtitle_stream: default_subtitle_stream(),
            tool_timeout_secs: default_tool_timeout_secs(),
            keep_caption_file: false,
            overwrite: true,
            log_level: LogLevel::default(),
        }
    }
}
