use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkerError>;

#[derive(Error, Debug)]
pub enum ChunkerError {
    #[error("invalid chunker bounds: chunk_size={chunk_size}, chunk_overlap={chunk_overlap} (need 0 < overlap < size)")]
    InvalidConfig {
        chunk_size: usize,
        chunk_overlap: usize,
    },

    #[error("empty document id")]
    EmptyDocumentId,
}
