//! Error types for quiz loading, sessions, snapshots and configuration.

use thiserror::Error;

/// Fatal startup errors. Each one replaces the whole quiz UI with a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("No quiz subject was specified in the URL.")]
    MissingParameter,

    #[error("Failed to load the quiz data file '{path}': {reason}. Check that the file exists.")]
    LoadFailure { path: String, reason: String },

    #[error("The quiz data file '{path}' is empty or malformed.")]
    MalformedData { path: String, detail: String },
}

/// Problems with a stored snapshot. Always recovered locally by starting fresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("stored snapshot is not valid JSON: {0}")]
    Corrupt(String),

    #[error("stored snapshot has {stored} questions, loaded data has {loaded}")]
    CountMismatch { stored: usize, loaded: usize },

    #[error("stored snapshot references unknown or repeated question {id}")]
    UnknownQuestion { id: String },
}

impl SnapshotError {
    /// A snapshot that parsed but no longer matches the loaded questions.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            SnapshotError::CountMismatch { .. } | SnapshotError::UnknownQuestion { .. }
        )
    }
}

/// Errors emitted by `QuizSession` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question index {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },

    #[error("answer type does not match a {kind} question")]
    WrongKind { kind: &'static str },

    #[error("option '{label}' does not exist for this question")]
    UnknownOption { label: String },
}

/// Errors from posting a runtime configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid quiz config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("display_labels must not be empty")]
    NoDisplayLabels,
}
