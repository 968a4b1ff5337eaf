/*!
 * Mock media tool for testing.
 *
 * This module provides a fake collaborator with canned outputs:
 * - `MockTool::working(metadata, captions)` - Always succeeds
 * - `MockTool::failing()` - Every call fails with a non-zero exit
 * - `MockTool::failing_captions(metadata)` - Metadata works, captions fail
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ToolError;
use crate::metadata::MetadataBlock;
use crate::subtitle_processor::CaptionDocument;
use crate::tools::MediaTool;

/// Behavior mode for the mock tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Every call succeeds with the canned outputs
    Working,
    /// Metadata succeeds, caption extraction fails
    FailingCaptions,
    /// Every call fails
    Failing,
    /// Simulates a slow tool before succeeding
    Slow { delay_ms: u64 },
}

/// Fake media tool returning canned outputs
#[derive(Debug, Clone)]
pub struct MockTool {
    behavior: MockBehavior,
    metadata: String,
    captions: String,
    metadata_calls: Arc<AtomicUsize>,
    caption_calls: Arc<AtomicUsize>,
    requested_names: Arc<Mutex<Vec<String>>>,
}

impl MockTool {
    /// Create a new mock tool with the specified behavior and outputs
    pub fn new(behavior: MockBehavior, metadata: impl Into<String>, captions: impl Into<String>) -> Self {
        Self {
            behavior,
            metadata: metadata.into(),
            captions: captions.into(),
            metadata_calls: Arc::new(AtomicUsize::new(0)),
            caption_calls: Arc::new(AtomicUsize::new(0)),
            requested_names: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always succeeds
    pub fn working(metadata: impl Into<String>, captions: impl Into<String>) -> Self {
        Self::new(MockBehavior::Working, metadata, captions)
    }

    /// Create a mock whose every call fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, "", "")
    }

    /// Create a mock that analyzes fine but cannot extract captions
    pub fn failing_captions(metadata: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingCaptions, metadata, "")
    }

    /// Number of metadata requests received
    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    /// Number of caption requests received
    pub fn caption_calls(&self) -> usize {
        self.caption_calls.load(Ordering::SeqCst)
    }

    /// Base names passed to `extract_captions`, in call order
    pub fn requested_names(&self) -> Vec<String> {
        self.requested_names
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    fn simulated_failure() -> ToolError {
        ToolError::NonZeroExit {
            tool: "mock".to_string(),
            status: 1,
            stderr: "Simulated tool failure".to_string(),
        }
    }
}

#[async_trait]
impl MediaTool for MockTool {
    async fn fetch_metadata(&self, _locator: &str) -> Result<MetadataBlock, ToolError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Failing => Err(Self::simulated_failure()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(MetadataBlock::new(self.metadata.clone()))
            }
            MockBehavior::Working | MockBehavior::FailingCaptions => {
                Ok(MetadataBlock::new(self.metadata.clone()))
            }
        }
    }

    async fn extract_captions(&self, _locator: &str, name: &str) -> Result<CaptionDocument, ToolError> {
        self.caption_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.requested_names.lock() {
            names.push(name.to_string());
        }

        match self.behavior {
            MockBehavior::Failing | MockBehavior::FailingCaptions => Err(Self::simulated_failure()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(CaptionDocument::in_memory(self.captions.clone()))
            }
            MockBehavior::Working => Ok(CaptionDocument::in_memory(self.captions.clone())),
        }
    }
}
