/*!
 * Error types for the subtext application.
 *
 * This module contains custom error types for the external tool collaborator,
 * the extraction workflow and the application as a whole, using the thiserror
 * crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when invoking the external media tool
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool could not be started (missing binary, permissions, ...)
    #[error("Failed to run {tool}: {message}")]
    SpawnFailed {
        /// Name or path of the tool
        tool: String,
        /// Underlying failure
        message: String,
    },

    /// The tool ran but finished with a non-zero status
    #[error("{tool} exited with status {status}: {stderr}")]
    NonZeroExit {
        /// Name or path of the tool
        tool: String,
        /// Exit code, -1 when terminated by a signal
        status: i32,
        /// Filtered stderr output
        stderr: String,
    },

    /// The tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Name or path of the tool
        tool: String,
        /// Configured timeout
        secs: u64,
    },

    /// The tool reported success but its output artifact is missing or unusable
    #[error("Tool output error: {0}")]
    Output(String),
}

/// Errors reported by the extraction workflow
///
/// None of these are fatal: the session is left in its pre-call state and the
/// same operation may be retried.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Empty locator or a name that sanitizes to nothing
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The external tool failed or was unreachable
    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(#[from] ToolError),

    /// The operation is disabled in the current session state
    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// Current session state
        state: String,
    },

    /// Writing the final artifact failed
    #[error("Output error: {0}")]
    Output(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the external tool
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error from the workflow
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl WorkflowError {
    /// Whether the error came from the external tool rather than user input
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::CollaboratorFailure(_))
    }
}
