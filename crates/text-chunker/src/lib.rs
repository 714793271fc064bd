//! # Docgraph Text Chunker
//!
//! Sentence-respecting segmentation of document text into retrieval-sized,
//! overlapping chunks.
//!
//! ## Pipeline
//!
//! ```text
//! Document text
//!     │
//!     ├──> Header scan (chapter / section / subsection lines)
//!     │      └─> informational positions
//!     │
//!     ├──> Sentence splitter
//!     │      └─> trimmed sentences
//!     │
//!     └──> Greedy packer (size bound S, overlap bound O)
//!            └─> Chunk[] with ordinals 0..n
//! ```
//!
//! ## Example
//!
//! ```
//! use docgraph_text_chunker::{Chunker, ChunkerConfig, Metadata};
//!
//! let chunker = Chunker::new(ChunkerConfig::new(1000, 200)).unwrap();
//! let chunks = chunker
//!     .chunk_text("Section 12 requires approval. Bids close at noon.", &Metadata::new(), "rules")
//!     .unwrap();
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].id, "rules_chunk_0");
//! ```

mod chunker;
mod config;
mod error;
mod headers;
mod sentence;
mod types;

pub use chunker::{Chunker, Segmentation};
pub use config::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use error::{ChunkerError, Result};
pub use headers::{identify_headers, HeaderKind, StructuralHeader};
pub use sentence::{char_len, split_sentences};
pub use types::{Chunk, Metadata};
