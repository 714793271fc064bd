use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::headers::{identify_headers, StructuralHeader};
use crate::sentence::{char_len, split_sentences};
use crate::types::{Chunk, Metadata};
use serde::{Deserialize, Serialize};

/// Output of segmenting one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segmentation {
    /// Ordinal-ordered chunks, ordinals `0..n`
    pub chunks: Vec<Chunk>,

    /// Header positions (informational)
    pub headers: Vec<StructuralHeader>,

    /// Number of sentences the text was split into
    pub sentence_count: usize,
}

/// Sentence-respecting greedy packer with sentence-level overlap
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Chunker initialized: size={}, overlap={}",
            config.chunk_size,
            config.chunk_overlap
        );
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Segment a document into chunks and collect its header positions
    pub fn segment(&self, text: &str, metadata: &Metadata, doc_id: &str) -> Result<Segmentation> {
        if doc_id.trim().is_empty() {
            return Err(ChunkerError::EmptyDocumentId);
        }

        let headers = identify_headers(text);
        let sentences = split_sentences(text);

        if sentences.is_empty() {
            log::warn!("No sentences found in document {doc_id}");
            return Ok(Segmentation {
                chunks: Vec::new(),
                headers,
                sentence_count: 0,
            });
        }

        let chunks = self.pack(&sentences, metadata, doc_id);
        log::info!(
            "Created {} chunks for document {doc_id} ({} sentences, {} headers)",
            chunks.len(),
            sentences.len(),
            headers.len()
        );

        Ok(Segmentation {
            chunks,
            headers,
            sentence_count: sentences.len(),
        })
    }

    /// Segment a document, keeping only the chunks
    pub fn chunk_text(&self, text: &str, metadata: &Metadata, doc_id: &str) -> Result<Vec<Chunk>> {
        Ok(self.segment(text, metadata, doc_id)?.chunks)
    }

    /// Greedy packing over a contiguous sentence window `[start, i)`.
    ///
    /// A chunk closes when the next sentence would push the window past
    /// `chunk_size`. The next window starts with the longest sentence tail of
    /// the closed chunk whose length stays within `chunk_overlap`, shortened
    /// from the front if it would not leave room for the incoming sentence.
    fn pack(&self, sentences: &[&str], metadata: &Metadata, doc_id: &str) -> Vec<Chunk> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        let lens: Vec<usize> = sentences.iter().map(|s| char_len(s)).collect();

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut acc = 0;

        for (i, &len) in lens.iter().enumerate() {
            if acc + len > size && i > start {
                chunks.push(Chunk::new(
                    doc_id,
                    chunks.len(),
                    &sentences[start..i],
                    start,
                    acc,
                    metadata,
                ));

                let mut carry_start = i;
                let mut carry_len = 0;
                while carry_start > start && carry_len + lens[carry_start - 1] <= overlap {
                    carry_start -= 1;
                    carry_len += lens[carry_start];
                }
                while carry_start < i && carry_len + len > size {
                    carry_len -= lens[carry_start];
                    carry_start += 1;
                }

                start = carry_start;
                acc = carry_len;
            }
            acc += len;
        }

        if start < sentences.len() {
            chunks.push(Chunk::new(
                doc_id,
                chunks.len(),
                &sentences[start..],
                start,
                acc,
                metadata,
            ));
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }
}
