use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open attribute bag shared by documents, chunks and graph nodes
pub type Metadata = BTreeMap<String, Value>;

/// Contiguous, size-bounded slice of a document's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `{doc_id}_chunk_{ordinal}`
    pub id: String,

    /// Owning document
    pub doc_id: String,

    /// Position in the document, starting at 0
    pub ordinal: usize,

    /// Sentences joined by a single space
    pub text: String,

    /// First sentence index (inclusive)
    pub start_sentence: usize,

    /// Last sentence index (exclusive)
    pub end_sentence: usize,

    /// Sum of the character lengths of the packed sentences
    pub length: usize,

    /// Document metadata plus provenance fields
    pub metadata: Metadata,
}

impl Chunk {
    /// Build the stable chunk id for a document ordinal
    #[must_use]
    pub fn make_id(doc_id: &str, ordinal: usize) -> String {
        format!("{doc_id}_chunk_{ordinal}")
    }

    pub(crate) fn new(
        doc_id: &str,
        ordinal: usize,
        sentences: &[&str],
        start_sentence: usize,
        length: usize,
        inherited: &Metadata,
    ) -> Self {
        let id = Self::make_id(doc_id, ordinal);
        let end_sentence = start_sentence + sentences.len();

        let mut metadata = inherited.clone();
        metadata.insert("chunk_id".into(), Value::from(id.clone()));
        metadata.insert("chunk_num".into(), Value::from(ordinal));
        metadata.insert("start_sentence".into(), Value::from(start_sentence));
        metadata.insert("end_sentence".into(), Value::from(end_sentence));
        metadata.insert("chunk_length".into(), Value::from(length));

        Self {
            id,
            doc_id: doc_id.to_string(),
            ordinal,
            text: sentences.join(" "),
            start_sentence,
            end_sentence,
            length,
            metadata,
        }
    }

    /// Number of sentences packed into this chunk
    #[must_use]
    pub const fn sentence_count(&self) -> usize {
        self.end_sentence - self.start_sentence
    }
}
