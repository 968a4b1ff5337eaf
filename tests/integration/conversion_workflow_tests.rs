/*!
 * Integration tests for file based caption handling
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use async_trait::async_trait;
use subtext::app_config::Config;
use subtext::app_controller::{ExtractionWorkflow, NamingMode, SessionState};
use subtext::errors::{ToolError, WorkflowError};
use subtext::file_utils::FileManager;
use subtext::metadata::MetadataBlock;
use subtext::subtitle_processor::{CaptionConverter, CaptionDocument};
use subtext::tools::MediaTool;
use crate::common;

/// Tool that writes its caption artifact to disk like ffmpeg does
#[derive(Debug)]
struct DiskTool {
    output_dir: PathBuf,
    // Fail on an existing caption file, as `ffmpeg -n` does
    refuse_existing: bool,
}

#[async_trait]
impl MediaTool for DiskTool {
    async fn fetch_metadata(&self, _locator: &str) -> Result<MetadataBlock, ToolError> {
        Ok(MetadataBlock::new(common::SAMPLE_METADATA))
    }

    async fn extract_captions(&self, _locator: &str, name: &str) -> Result<CaptionDocument, ToolError> {
        let path = FileManager::output_path(&self.output_dir, name, "srt");
        if self.refuse_existing && path.exists() {
            return Err(ToolError::NonZeroExit {
                tool: "disk".to_string(),
                status: 1,
                stderr: format!("File '{}' already exists. Exiting.", path.display()),
            });
        }
        std::fs::write(&path, common::SAMPLE_CAPTIONS)
            .map_err(|e| ToolError::Output(e.to_string()))?;
        Ok(CaptionDocument::from_file_content(path, common::SAMPLE_CAPTIONS.to_string()))
    }
}

async fn run_cycle(dir: &Path, config: &Config) -> Result<subtext::app_controller::ExtractionReport> {
    let tool = DiskTool { output_dir: dir.to_path_buf(), refuse_existing: false };
    let mut workflow = ExtractionWorkflow::new(tool, config);
    workflow.analyze("video.mkv").await?;
    workflow.set_naming_mode(NamingMode::UseTitle)?;
    let report = workflow.extract("video.mkv").await?;
    assert_eq!(workflow.state(), SessionState::Completed);
    Ok(report)
}

/// Test that the intermediate caption file is discarded
#[tokio::test]
async fn test_extract_withDiskArtifact_shouldRemoveCaptionFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_for_dir(temp_dir.path());

    let report = run_cycle(temp_dir.path(), &config).await?;

    assert!(report.kept_caption.is_none());
    assert!(!temp_dir.path().join("Mi Titulo.srt").exists());
    assert_eq!(std::fs::read_to_string(temp_dir.path().join("Mi Titulo.txt"))?, common::SAMPLE_TEXT);

    // Only the text file is left behind
    let remaining: Vec<_> = std::fs::read_dir(temp_dir.path())?.collect();
    assert_eq!(remaining.len(), 1);
    Ok(())
}

/// Test keeping the caption file on request
#[tokio::test]
async fn test_extract_withKeepCaptionFile_shouldLeaveCaptionInPlace() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config {
        keep_caption_file: true,
        ..common::config_for_dir(temp_dir.path())
    };

    let report = run_cycle(temp_dir.path(), &config).await?;

    let caption = temp_dir.path().join("Mi Titulo.srt");
    assert_eq!(report.kept_caption.as_deref(), Some(caption.as_path()));
    assert!(caption.exists());
    Ok(())
}

/// Test a custom text extension and nested output directory
#[tokio::test]
async fn test_extract_withCustomExtension_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir_all(&out_dir)?;
    let config = Config {
        text_extension: "md".to_string(),
        ..common::config_for_dir(&out_dir)
    };

    let report = run_cycle(&out_dir, &config).await?;

    assert_eq!(report.output_path, out_dir.join("Mi Titulo.md"));
    assert_eq!(report.text_chars, common::SAMPLE_TEXT.chars().count());
    Ok(())
}

/// Test that a failed text write removes the caption file so a retry can succeed
#[tokio::test]
async fn test_extract_withUnwritableOutput_shouldRemoveCaptionAndAllowRetry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(temp_dir.path(), "blocker", "not a directory")?;
    let config = Config {
        overwrite: false,
        ..common::config_for_dir(&blocker.join("out"))
    };
    let tool = DiskTool { output_dir: temp_dir.path().to_path_buf(), refuse_existing: true };
    let mut workflow = ExtractionWorkflow::new(tool, &config);
    workflow.analyze("video.mkv").await?;
    workflow.set_naming_mode(NamingMode::UseTitle)?;

    let result = workflow.extract("video.mkv").await;
    assert!(matches!(result, Err(WorkflowError::Output(_))));
    assert_eq!(workflow.state(), SessionState::Ready);
    assert!(!temp_dir.path().join("Mi Titulo.srt").exists());

    // The tool refuses existing caption files, so the retry needs the cleanup above
    std::fs::remove_file(&blocker)?;
    let report = workflow.extract("video.mkv").await?;
    assert_eq!(workflow.state(), SessionState::Completed);
    assert_eq!(std::fs::read_to_string(&report.output_path)?, common::SAMPLE_TEXT);
    Ok(())
}

/// Test that a failed text write leaves a kept caption file alone
#[tokio::test]
async fn test_extract_withUnwritableOutputAndKeepCaption_shouldKeepCaptionFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(temp_dir.path(), "blocker", "not a directory")?;
    let config = Config {
        keep_caption_file: true,
        ..common::config_for_dir(&blocker.join("out"))
    };
    let tool = DiskTool { output_dir: temp_dir.path().to_path_buf(), refuse_existing: false };
    let mut workflow = ExtractionWorkflow::new(tool, &config);
    workflow.analyze("video.mkv").await?;
    workflow.set_naming_mode(NamingMode::UseTitle)?;

    let result = workflow.extract("video.mkv").await;

    assert!(matches!(result, Err(WorkflowError::Output(_))));
    assert!(temp_dir.path().join("Mi Titulo.srt").exists());
    Ok(())
}

/// Test converting a directory of caption files one by one
#[test]
fn test_convert_directory_withSeveralFiles_shouldWriteTextNextToEach() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "one.srt")?;
    common::create_test_file(temp_dir.path(), "two.srt", "1\n00:00:00,000 --> 00:00:01,000\n<b>Two</b>\n")?;

    for file in FileManager::find_files(temp_dir.path(), "srt")? {
        CaptionConverter::convert_file_to(&file, file.with_extension("txt"))?;
    }

    assert_eq!(FileManager::read_to_string(temp_dir.path().join("one.txt"))?, common::SAMPLE_TEXT);
    assert_eq!(FileManager::read_to_string(temp_dir.path().join("two.txt"))?, "Two");
    Ok(())
}
