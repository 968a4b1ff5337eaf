/*!
 * # subtext - embedded subtitles to plain text
 *
 * A Rust library that pulls the first subtitle track out of a local or remote
 * media resource and turns it into a single readable paragraph, named after
 * the media title.
 *
 * ## Features
 *
 * - Read the media title from ffmpeg metadata
 * - Derive a filesystem-safe file name from arbitrary Unicode text
 * - Flatten SRT captions into plain text (indices, timings and tags removed)
 * - Analyze/extract session workflow usable from any front end
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `metadata`: `key=value` metadata parsing and title lookup
 * - `file_utils`: File name sanitization and file system operations
 * - `subtitle_processor`: Caption to plain text conversion
 * - `tools`: External media tool collaborators:
 *   - `tools::ffmpeg`: ffmpeg command line driver
 *   - `tools::mock`: Canned fake for tests
 * - `app_controller`: Session state machine (analyze, name, extract, reset)
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod metadata;
pub mod file_utils;
pub mod subtitle_processor;
pub mod tools;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Capabilities, ExtractionWorkflow, NamingMode, SessionState};
pub use file_utils::sanitize_filename;
pub use metadata::{extract_title, MetadataBlock};
pub use subtitle_processor::{CaptionConverter, CaptionDocument};
pub use tools::MediaTool;
pub use errors::{AppError, ToolError, WorkflowError};
