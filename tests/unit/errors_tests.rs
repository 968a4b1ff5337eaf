/*!
 * Tests for error types and conversions
 */

use subtext::errors::{AppError, ToolError, WorkflowError};

#[test]
fn test_toolError_nonZeroExit_shouldDisplayStatusAndStderr() {
    let error = ToolError::NonZeroExit {
        tool: "ffmpeg".to_string(),
        status: 1,
        stderr: "Stream map '0:s:0' matches no streams.".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("ffmpeg"));
    assert!(display.contains("status 1"));
    assert!(display.contains("matches no streams"));
}

#[test]
fn test_toolError_timeout_shouldDisplaySeconds() {
    let error = ToolError::Timeout { tool: "ffmpeg".to_string(), secs: 120 };
    assert_eq!(format!("{}", error), "ffmpeg timed out after 120 seconds");
}

#[test]
fn test_workflowError_fromToolError_shouldWrapAsCollaboratorFailure() {
    let tool_error = ToolError::SpawnFailed {
        tool: "ffmpeg".to_string(),
        message: "No such file or directory".to_string(),
    };
    let workflow_error: WorkflowError = tool_error.into();
    assert!(workflow_error.is_collaborator_failure());
    assert!(format!("{}", workflow_error).contains("Collaborator failure"));
}

#[test]
fn test_workflowError_missingInput_shouldNotBeCollaboratorFailure() {
    let error = WorkflowError::MissingInput("Please enter an output file name".to_string());
    assert!(!error.is_collaborator_failure());
    assert!(format!("{}", error).contains("output file name"));
}

#[test]
fn test_workflowError_invalidState_shouldNameOperationAndState() {
    let error = WorkflowError::InvalidState { operation: "extract", state: "idle".to_string() };
    assert_eq!(format!("{}", error), "Cannot extract while the session is idle");
}

#[test]
fn test_appError_fromWorkflowError_shouldWrapCorrectly() {
    let app_error: AppError = WorkflowError::Output("disk full".to_string()).into();
    assert!(format!("{}", app_error).contains("Workflow error"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhow_shouldWrapAsUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(format!("{}", app_error), "Unknown error: boom");
}
