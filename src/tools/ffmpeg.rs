/*!
 * ffmpeg-backed media tool.
 *
 * Metadata is dumped with `-f ffmetadata` into a scratch directory and read
 * back; captions are converted with `-c:s srt` into `<output_dir>/<name>.srt`.
 */

use async_trait::async_trait;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::Config;
use crate::errors::ToolError;
use crate::file_utils::FileManager;
use crate::metadata::MetadataBlock;
use crate::subtitle_processor::CaptionDocument;
use crate::tools::MediaTool;

// @const: Scratch file name for the metadata dump
const METADATA_FILE_NAME: &str = "metadata.txt";

/// Media tool driving the ffmpeg command line
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    // @field: Executable name or path
    program: String,
    // @field: Where caption files are written
    output_dir: PathBuf,
    // @field: Caption file extension
    caption_extension: String,
    // @field: Stream specifier of the subtitle track
    subtitle_stream: String,
    // @field: Per-invocation time limit
    timeout: Duration,
    // @field: Overwrite existing caption files
    overwrite: bool,
}

impl FfmpegTool {
    /// Create a tool from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.ffmpeg_path.clone(),
            output_dir: config.output_dir.clone(),
            caption_extension: config.caption_extension.clone(),
            subtitle_stream: config.subtitle_stream.clone(),
            timeout: Duration::from_secs(config.tool_timeout_secs),
            overwrite: config.overwrite,
        }
    }

    /// Path the caption artifact for `name` is written to
    pub fn caption_path(&self, name: &str) -> PathBuf {
        FileManager::output_path(&self.output_dir, name, &self.caption_extension)
    }

    /// Arguments for dumping the metadata of `locator` into `target`
    pub fn metadata_args(locator: &str, target: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(), locator.to_string(),
            "-f".to_string(), "ffmetadata".to_string(),
            target.to_string_lossy().to_string(),
        ]
    }

    /// Arguments for converting the subtitle track of `locator` into `target`
    pub fn caption_args(&self, locator: &str, target: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            if self.overwrite { "-y" } else { "-n" }.to_string(),
            "-i".to_string(), locator.to_string(),
            "-map".to_string(), self.subtitle_stream.clone(),
            "-c:s".to_string(), "srt".to_string(),
            target.to_string_lossy().to_string(),
        ]
    }

    /// Run ffmpeg with `args`, mapping every failure mode to a `ToolError`
    async fn run(&self, args: &[String]) -> Result<Output, ToolError> {
        debug!("Running {} {}", self.program, args.join(" "));

        let ffmpeg_future = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| ToolError::SpawnFailed {
                    tool: self.program.clone(),
                    message: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ToolError::Timeout {
                    tool: self.program.clone(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", self.program, filtered);
            return Err(ToolError::NonZeroExit {
                tool: self.program.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: filtered,
            });
        }

        Ok(output)
    }

    fn remove_caption(target: &Path) {
        if let Err(e) = FileManager::remove_file_if_exists(target) {
            warn!("Could not remove caption file {:?}: {:#}", target, e);
        }
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn fetch_metadata(&self, locator: &str) -> Result<MetadataBlock, ToolError> {
        // The scratch directory and its dump are removed when `scratch` drops
        let scratch = tempfile::tempdir()
            .map_err(|e| ToolError::Output(format!("Failed to create scratch directory: {}", e)))?;
        let target = scratch.path().join(METADATA_FILE_NAME);

        self.run(&Self::metadata_args(locator, &target)).await?;

        let raw = std::fs::read_to_string(&target)
            .map_err(|e| ToolError::Output(format!("Failed to read metadata dump {:?}: {}", target, e)))?;
        Ok(MetadataBlock::new(raw))
    }

    async fn extract_captions(&self, locator: &str, name: &str) -> Result<CaptionDocument, ToolError> {
        FileManager::ensure_dir(&self.output_dir)
            .map_err(|e| ToolError::Output(e.to_string()))?;
        let target = self.caption_path(name);

        self.run(&self.caption_args(locator, &target)).await?;

        let content = match std::fs::read_to_string(&target) {
            Ok(content) => content,
            Err(e) => {
                Self::remove_caption(&target);
                return Err(ToolError::Output(format!("Failed to read caption file {:?}: {}", target, e)));
            }
        };
        if content.trim().is_empty() {
            // Nothing to convert, so the artifact is useless
            Self::remove_caption(&target);
            return Err(ToolError::Output(format!(
                "Extracted caption file is empty, no subtitles found in stream {}",
                self.subtitle_stream
            )));
        }

        Ok(CaptionDocument::from_file_content(target, content))
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "title",
        "BPS",
        "DURATION",
        "NUMBER_OF",
        "_STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
