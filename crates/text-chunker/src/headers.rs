use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of structural header found at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderKind {
    Chapter,
    Section,
    Subsection,
}

impl HeaderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Section => "section",
            Self::Subsection => "subsection",
        }
    }
}

/// Header position recorded during segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralHeader {
    /// Zero-based line index in the source text
    pub line: usize,
    pub kind: HeaderKind,
    /// Trimmed header line
    pub title: String,
}

static HEADER_PATTERNS: Lazy<Vec<(Regex, HeaderKind)>> = Lazy::new(|| {
    [
        (r"(?i)^(CHAPTER|अध्याय)\s+([IVX\d]+)", HeaderKind::Chapter),
        (r"(?i)^(\d+)\.\s+([A-Z][^.]+)", HeaderKind::Section),
        (r"(?i)^\(([a-z])\)", HeaderKind::Subsection),
    ]
    .into_iter()
    .map(|(pattern, kind)| {
        (
            Regex::new(pattern).expect("header pattern is valid"),
            kind,
        )
    })
    .collect()
});

/// Scan text line by line for chapter, section and subsection headers.
///
/// First matching pattern wins per line. The result is informational and
/// does not influence chunk boundaries.
#[must_use]
pub fn identify_headers(text: &str) -> Vec<StructuralHeader> {
    text.lines()
        .enumerate()
        .filter_map(|(line, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            HEADER_PATTERNS
                .iter()
                .find(|(re, _)| re.is_match(trimmed))
                .map(|(_, kind)| StructuralHeader {
                    line,
                    kind: *kind,
                    title: trimmed.to_string(),
                })
        })
        .collect()
}
