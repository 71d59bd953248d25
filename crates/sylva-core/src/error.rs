//! Error types for Sylva

use thiserror::Error;

/// Result type alias using Sylva's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Sylva operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter in a generation config
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Grammar rejected at construction time
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Grammar expansion outgrew the symbol limit
    #[error("Sentence exceeded {limit} symbols in generation {generation}")]
    SentenceTooLong { limit: usize, generation: u32 },

    /// No preset registered under this name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
