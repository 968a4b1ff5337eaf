use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::Result;
use log::debug;
use crate::file_utils::FileManager;

// @module: Caption document to plain text conversion

// @const: Index line (digits only)
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @const: Timing line prefix (two-digit hour followed by a colon)
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:").unwrap()
});

// @const: Angle-bracket markup, non-greedy
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<.*?>").unwrap()
});

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Role of a raw line inside a caption document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Sequence number of an entry
    Index,
    /// `HH:MM:SS,mmm --> HH:MM:SS,mmm` line; only the `HH:` prefix is checked
    Timing,
    /// Empty or whitespace-only separator
    Blank,
    /// Anything else
    Text,
}

/// Classify one raw line
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if INDEX_REGEX.is_match(trimmed) {
        LineKind::Index
    } else if TIMING_REGEX.is_match(trimmed) {
        LineKind::Timing
    } else {
        LineKind::Text
    }
}

/// Remove `<...>` markup from a text line and trim it
///
/// Returns `None` when nothing is left. An unmatched `<` has no closing
/// bracket to pair with and is kept as-is.
pub fn clean_text_line(line: &str) -> Option<Cow<'_, str>> {
    let cleaned = MARKUP_REGEX.replace_all(line, "");
    let is_empty = cleaned.trim().is_empty();
    if is_empty {
        return None;
    }
    Some(match cleaned {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    })
}

/// Counters gathered while converting a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub total_lines: usize,
    pub index_lines: usize,
    pub timing_lines: usize,
    pub blank_lines: usize,
    pub text_lines: usize,
}

/// Converts timed caption text into one flat paragraph
pub struct CaptionConverter;

impl CaptionConverter {
    /// Convert raw lines, joining the surviving text with single spaces
    pub fn convert_lines<I, S>(lines: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::convert_lines_with_stats(lines).0
    }

    /// Same as [`convert_lines`](Self::convert_lines), also returning line counters
    pub fn convert_lines_with_stats<I, S>(lines: I) -> (String, ConversionStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = ConversionStats::default();
        let mut text = String::new();

        for line in lines {
            let line = line.as_ref();
            stats.total_lines += 1;

            match classify_line(line) {
                LineKind::Index => stats.index_lines += 1,
                LineKind::Timing => stats.timing_lines += 1,
                LineKind::Blank => stats.blank_lines += 1,
                LineKind::Text => {
                    // Markup-only lines count as blank
                    match clean_text_line(line) {
                        Some(cleaned) => {
                            stats.text_lines += 1;
                            if !text.is_empty() {
                                text.push(' ');
                            }
                            text.push_str(&cleaned);
                        }
                        None => stats.blank_lines += 1,
                    }
                }
            }
        }

        (text, stats)
    }

    /// Convert a whole document held in memory
    pub fn convert_str(content: &str) -> String {
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
        Self::convert_lines(content.lines())
    }

    /// Read a caption file and convert it
    pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<String> {
        let content = FileManager::read_to_string(&path)?;
        Ok(Self::convert_str(&content))
    }

    /// Convert a caption file and write the text to `output`
    pub fn convert_file_to<P1: AsRef<Path>, P2: AsRef<Path>>(input: P1, output: P2) -> Result<ConversionStats> {
        let content = FileManager::read_to_string(&input)?;
        let document = CaptionDocument::from_file_content(input.as_ref().to_path_buf(), content);
        let (text, stats) = document.to_plain_text_with_stats();
        FileManager::write_to_file(&output, &text)?;
        debug!(
            "Converted {:?} -> {:?}: kept {} of {} lines",
            input.as_ref(), output.as_ref(), stats.text_lines, stats.total_lines
        );
        Ok(stats)
    }
}

/// Caption text produced by the media tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionDocument {
    /// File the document was read from, if it lives on disk
    pub source: Option<PathBuf>,
    /// Raw caption text
    pub content: String,
}

impl CaptionDocument {
    /// Document held only in memory
    pub fn in_memory(content: impl Into<String>) -> Self {
        Self {
            source: None,
            content: content.into(),
        }
    }

    /// Document backed by a file on disk
    pub fn from_file_content(source: PathBuf, content: String) -> Self {
        Self {
            source: Some(source),
            content,
        }
    }

    /// Flatten the document into plain text
    pub fn to_plain_text(&self) -> String {
        self.to_plain_text_with_stats().0
    }

    /// Flatten the document, also returning line counters
    pub fn to_plain_text_with_stats(&self) -> (String, ConversionStats) {
        let content = self.content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&self.content);
        CaptionConverter::convert_lines_with_stats(content.lines())
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} lines ({} text, {} index, {} timing, {} blank)",
            self.total_lines, self.text_lines, self.index_lines, self.timing_lines, self.blank_lines
        )
    }
}
