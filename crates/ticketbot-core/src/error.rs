//! Error types for the booking assistant core.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while producing a reply or handling config.
///
/// Users only ever see one class of failure ("the reply failed"); the
/// variants exist so callers and logs can tell the causes apart.
#[derive(Error, Debug)]
pub enum AgentError {
    /// A prompt was submitted with no visible text
    #[error("Prompt is empty")]
    EmptyPrompt,
    /// A reply is already outstanding
    #[error("A reply is already pending")]
    Busy,
    /// The pending reply was abandoned before it was delivered
    #[error("Reply was cancelled before it was delivered")]
    Cancelled,
    /// The background reply task panicked
    #[error("Reply task failed: {0}")]
    TaskFailed(String),
    /// Configuration could not be located or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, AgentError>;
