/*!
 * External media tool collaborators.
 *
 * The workflow never spawns processes itself; it talks to a `MediaTool`:
 * - `ffmpeg`: the real implementation driving the ffmpeg binary
 * - `mock`: a deterministic fake with canned outputs for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ToolError;
use crate::metadata::MetadataBlock;
use crate::subtitle_processor::CaptionDocument;

/// Narrow interface to the external media-processing tool
///
/// Each call blocks the calling session until the tool finishes, fails or
/// times out; there is no mid-call cancellation.
#[async_trait]
pub trait MediaTool: Send + Sync + Debug {
    /// Collect the `key=value` metadata of the media behind `locator`
    ///
    /// # Arguments
    /// * `locator` - URL or path of the media resource
    async fn fetch_metadata(&self, locator: &str) -> Result<MetadataBlock, ToolError>;

    /// Extract the first subtitle track of `locator` as timed caption text
    ///
    /// # Arguments
    /// * `locator` - URL or path of the media resource
    /// * `name` - sanitized base name the caption artifact is stored under
    async fn extract_captions(&self, locator: &str, name: &str) -> Result<CaptionDocument, ToolError>;
}

pub mod ffmpeg;
pub mod mock;
