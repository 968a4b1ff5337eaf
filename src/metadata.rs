use std::collections::BTreeMap;

// @module: Media metadata parsing

/// Placeholder shown when the metadata carries no title
pub const UNKNOWN_TITLE: &str = "unknown";

// @const: Key prefix of the title line
const TITLE_PREFIX: &str = "title=";

/// Raw `key=value` metadata text as produced by the media tool
///
/// Lines that are not `key=value` pairs (headers such as `;FFMETADATA1`,
/// section markers, blank lines) are tolerated and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    raw: String,
}

impl MetadataBlock {
    /// Wrap raw metadata text
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The untouched metadata text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Title of the media, if any line carries one
    pub fn title(&self) -> Option<&str> {
        extract_title(&self.raw)
    }

    /// All `key=value` fields, keeping the first occurrence of each key
    pub fn fields(&self) -> BTreeMap<&str, &str> {
        let mut fields = BTreeMap::new();
        for line in self.raw.lines() {
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() || key.starts_with(';') {
                    continue;
                }
                fields.entry(key).or_insert_with(|| value.trim());
            }
        }
        fields
    }
}

impl From<String> for MetadataBlock {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Return the value of the first line starting with `title=`
///
/// Everything after the first `=` is the value, trimmed of surrounding
/// whitespace. Later `title=` lines are ignored. `None` means the block has no
/// title line at all.
pub fn extract_title(block: &str) -> Option<&str> {
    block
        .lines()
        .find(|line| line.starts_with(TITLE_PREFIX))
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| value.trim())
}

/// Title to display, falling back to the placeholder
pub fn display_title(title: Option<&str>) -> &str {
    title.unwrap_or(UNKNOWN_TITLE)
}
