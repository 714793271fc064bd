use crate::types::NodeType;
use docgraph_text_chunker::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECTION_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)section\s+(\d+)").expect("section pattern is valid"));

// Roman numerals need a word boundary so "Chapter Introduction" yields
// nothing; digits match a prefix, as section numbers do ("Chapter 3A").
static CHAPTER_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)chapter\s+([ivx]+\b|\d+)").expect("chapter pattern is valid")
});

/// Kind of structural entity cited in chunk text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Section,
    Chapter,
}

impl EntityKind {
    #[must_use]
    pub const fn node_type(self) -> NodeType {
        match self {
            Self::Section => NodeType::Section,
            Self::Chapter => NodeType::Chapter,
        }
    }

    const fn numeral_attr(self) -> &'static str {
        match self {
            Self::Section => "section_num",
            Self::Chapter => "chapter_num",
        }
    }
}

/// A `(kind, numeral)` pair; its id is the singleton node key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub numeral: String,
}

impl EntityRef {
    /// Node id, e.g. `section_12` or `chapter_IV`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}", self.kind.node_type().as_str(), self.numeral)
    }

    #[must_use]
    pub fn attributes(&self) -> Metadata {
        let mut attrs = Metadata::new();
        attrs.insert(
            self.kind.numeral_attr().to_string(),
            Value::from(self.numeral.clone()),
        );
        attrs
    }
}

/// Collect distinct section and chapter citations in first-occurrence order.
///
/// Decimal numerals lose leading zeros; roman numerals are upper-cased, so
/// "chapter iv" and "Chapter IV" resolve to the same entity.
#[must_use]
pub fn extract_entities(text: &str) -> Vec<EntityRef> {
    let mut found: Vec<EntityRef> = Vec::new();
    let mut push = |entity: EntityRef| {
        if !found.contains(&entity) {
            found.push(entity);
        }
    };

    for caps in SECTION_REF.captures_iter(text) {
        push(EntityRef {
            kind: EntityKind::Section,
            numeral: normalize_numeral(&caps[1]),
        });
    }
    for caps in CHAPTER_REF.captures_iter(text) {
        push(EntityRef {
            kind: EntityKind::Chapter,
            numeral: normalize_numeral(&caps[1]),
        });
    }

    found
}

fn normalize_numeral(raw: &str) -> String {
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = raw.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        raw.to_ascii_uppercase()
    }
}
