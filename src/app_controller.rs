use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;
use crate::app_config::Config;
use crate::errors::WorkflowError;
use crate::file_utils::{sanitize_filename, FileManager};
use crate::metadata::{self, UNKNOWN_TITLE};
use crate::subtitle_processor::ConversionStats;
use crate::tools::MediaTool;

// @module: Analyze/extract workflow driving one interactive session

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing analyzed yet
    #[default]
    Idle,
    /// Metadata looked up, title possibly missing
    Analyzed,
    /// Naming fields and extraction enabled
    Ready,
    /// Text written; only `reset` is accepted
    Completed,
}

impl SessionState {
    // @returns: Enabled fields and actions for this state
    pub fn capabilities(self) -> Capabilities {
        Capabilities::for_state(self)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Analyzed => "analyzed",
            Self::Ready => "ready",
            Self::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

/// Which inputs and actions a front end should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub locator_input: bool,
    pub naming_fields: bool,
    pub analyze_action: bool,
    pub extract_action: bool,
}

impl Capabilities {
    /// Pure mapping from session state to enabled controls
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Idle => Self {
                locator_input: true,
                naming_fields: false,
                analyze_action: true,
                extract_action: false,
            },
            SessionState::Analyzed | SessionState::Ready => Self {
                locator_input: true,
                naming_fields: true,
                analyze_action: true,
                extract_action: true,
            },
            SessionState::Completed => Self {
                locator_input: false,
                naming_fields: false,
                analyze_action: false,
                extract_action: false,
            },
        }
    }
}

/// Source of the output file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// Sanitized media title, read-only
    UseTitle,
    /// Free text typed by the user
    #[default]
    Custom,
}

impl NamingMode {
    fn toggled(self) -> Self {
        match self {
            Self::UseTitle => Self::Custom,
            Self::Custom => Self::UseTitle,
        }
    }
}

/// Values held for the duration of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Last locator accepted by `analyze` or `extract`
    pub locator: String,
    /// Raw title for display; `None` when the metadata had none
    pub title: Option<String>,
    /// Sanitized title used as default name
    pub title_name: String,
    pub naming_mode: NamingMode,
    pub custom_name: String,
}

/// Result of a successful `analyze`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub title: Option<String>,
    pub default_name: String,
}

impl AnalysisReport {
    /// Title to display, or the placeholder
    pub fn display_title(&self) -> &str {
        metadata::display_title(self.title.as_deref())
    }

    /// Message for the user
    pub fn message(&self) -> String {
        match &self.title {
            Some(title) => format!("Title: {}", title),
            None => "No title found".to_string(),
        }
    }
}

/// Result of a successful `extract`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Sanitized base name used for both artifacts
    pub name: String,
    /// Final plain text file
    pub output_path: PathBuf,
    /// Intermediate caption file, if the tool produced one and it was kept
    pub kept_caption: Option<PathBuf>,
    pub stats: ConversionStats,
    /// Length of the written text in characters
    pub text_chars: usize,
}

impl ExtractionReport {
    /// Message for the user
    pub fn message(&self) -> String {
        format!("Subtitles converted to text as {}", self.output_path.display())
    }
}

/// State machine sequencing "analyze" then "extract"
///
/// Every transition takes `&mut self` and holds it across the tool call, so a
/// session never runs two operations at once. Failed operations leave the
/// state and session values as they were before the call.
#[derive(Debug)]
pub struct ExtractionWorkflow<T: MediaTool> {
    // @field: External tool collaborator
    tool: T,
    // @field: Current state
    state: SessionState,
    // @field: Session-held values
    session: Session,
    // @field: Directory of the final text file
    output_dir: PathBuf,
    // @field: Extension of the final text file
    text_extension: String,
    // @field: Keep the intermediate caption file
    keep_caption_file: bool,
}

impl<T: MediaTool> ExtractionWorkflow<T> {
    // @method: Create a workflow with the given tool and configuration
    pub fn new(tool: T, config: &Config) -> Self {
        Self {
            tool,
            state: SessionState::Idle,
            session: Session::default(),
            output_dir: config.output_dir.clone(),
            text_extension: config.text_extension.clone(),
            keep_caption_file: config.keep_caption_file,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn capabilities(&self) -> Capabilities {
        self.state.capabilities()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Title to display; the placeholder until a title has been found
    pub fn display_title(&self) -> &str {
        self.session.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    /// Look up the title of `locator` and enable naming and extraction
    pub async fn analyze(&mut self, locator: &str) -> Result<AnalysisReport, WorkflowError> {
        self.ensure_allowed("analyze", self.capabilities().analyze_action)?;

        let locator = locator.trim();
        if locator.is_empty() {
            return Err(WorkflowError::MissingInput("Please enter a video URL or path".to_string()));
        }

        let metadata = self.tool.fetch_metadata(locator).await?;
        debug!("Full metadata for {}:\n{}", locator, metadata.as_str());
        for (key, value) in metadata.fields() {
            debug!("  {} = {}", key, value);
        }

        let title = metadata.title().map(str::to_string);
        let default_name = match &title {
            Some(title) => {
                info!("Extracted title: {}", title);
                sanitize_filename(title)
            }
            None => {
                warn!("No title found in metadata of {}", locator);
                String::new()
            }
        };

        self.session.locator = locator.to_string();
        self.session.title = title.clone();
        self.session.title_name = default_name.clone();
        self.state = SessionState::Analyzed;
        self.enable_naming();

        Ok(AnalysisReport { title, default_name })
    }

    /// Switch between the title and the custom name
    pub fn toggle_naming_mode(&mut self) -> Result<NamingMode, WorkflowError> {
        self.ensure_allowed("change the naming mode", self.capabilities().naming_fields)?;
        self.session.naming_mode = self.session.naming_mode.toggled();
        Ok(self.session.naming_mode)
    }

    /// Select a naming mode explicitly
    pub fn set_naming_mode(&mut self, mode: NamingMode) -> Result<(), WorkflowError> {
        self.ensure_allowed("change the naming mode", self.capabilities().naming_fields)?;
        self.session.naming_mode = mode;
        Ok(())
    }

    /// Edit the custom name field
    pub fn set_custom_name(&mut self, name: &str) -> Result<(), WorkflowError> {
        self.ensure_allowed("edit the custom name", self.capabilities().naming_fields)?;
        self.session.custom_name = name.to_string();
        Ok(())
    }

    /// Name the artifacts would get right now
    pub fn resolved_name(&self) -> String {
        match self.session.naming_mode {
            NamingMode::UseTitle => sanitize_filename(&self.session.title_name),
            NamingMode::Custom => sanitize_filename(self.session.custom_name.trim()),
        }
    }

    /// Extract the captions of `locator`, write them as plain text and complete the cycle
    pub async fn extract(&mut self, locator: &str) -> Result<ExtractionReport, WorkflowError> {
        self.ensure_allowed("extract", self.capabilities().extract_action)?;

        let locator = locator.trim();
        if locator.is_empty() {
            return Err(WorkflowError::MissingInput("Please enter a video URL or path".to_string()));
        }

        let name = self.resolved_name();
        if !is_usable_name(&name) {
            return Err(WorkflowError::MissingInput("Please enter an output file name".to_string()));
        }

        let document = self.tool.extract_captions(locator, &name).await?;
        let (text, stats) = document.to_plain_text_with_stats();
        debug!("Caption conversion: {}", stats);
        if text.is_empty() {
            warn!("No caption text found for {}, writing an empty file", locator);
        }

        let output_path = FileManager::output_path(&self.output_dir, &name, &self.text_extension);
        if let Err(e) = FileManager::write_to_file(&output_path, &text) {
            // A leftover caption file would make a no-overwrite retry fail
            self.discard_caption(document.source);
            return Err(WorkflowError::Output(format!("{:#}", e)));
        }

        let kept_caption = self.discard_caption(document.source);

        self.session.locator = locator.to_string();
        self.state = SessionState::Completed;

        let report = ExtractionReport {
            name,
            output_path,
            kept_caption,
            stats,
            text_chars: text.chars().count(),
        };
        info!("{}", report.message());
        Ok(report)
    }

    /// Clear every session value and return to `Idle`
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.state = SessionState::Idle;
    }

    // @returns: The caption path when it is kept, after removing it otherwise
    fn discard_caption(&self, source: Option<PathBuf>) -> Option<PathBuf> {
        match source {
            Some(source) if self.keep_caption_file => Some(source),
            Some(source) => {
                if let Err(e) = FileManager::remove_file_if_exists(&source) {
                    warn!("Could not remove intermediate caption file: {:#}", e);
                }
                None
            }
            None => None,
        }
    }

    fn enable_naming(&mut self) {
        if self.state == SessionState::Analyzed {
            self.state = SessionState::Ready;
        }
    }

    fn ensure_allowed(&self, operation: &'static str, enabled: bool) -> Result<(), WorkflowError> {
        if enabled {
            Ok(())
        } else {
            Err(WorkflowError::InvalidState {
                operation,
                state: self.state.to_string(),
            })
        }
    }
}

/// A name is usable when something other than underscores and whitespace remains
fn is_usable_name(name: &str) -> bool {
    name.chars().any(|c| c != '_' && !c.is_whitespace())
}
