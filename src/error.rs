//! Error types for the semindex CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=provider, 4=response, etc.)
//! - Retryability flags for agent self-correction
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for semindex operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Agents match on the string; shell scripts on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config (exit 2)
    ConfigError,

    // Provider transport (exit 3)
    ProviderError,

    // Provider response (exit 4)
    FormatError,
    CountMismatch,

    // Internal invariant (exit 5)
    DataIntegrity,

    // I/O (exit 6)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::FormatError => "FORMAT_ERROR",
            Self::CountMismatch => "COUNT_MISMATCH",
            Self::DataIntegrity => "DATA_INTEGRITY",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigError => 2,
            Self::ProviderError => 3,
            Self::FormatError | Self::CountMismatch => 4,
            Self::DataIntegrity => 5,
            Self::IoError | Self::JsonError => 6,
        }
    }

    /// Whether an agent should retry the invocation.
    ///
    /// True only for transport failures against the embedding provider,
    /// which are typically transient (server not yet started, restart in
    /// progress). Response-shape and integrity errors are not retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in semindex operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("embedding provider request failed ({url}, model: {model}): {cause}")]
    Provider {
        url: String,
        model: String,
        cause: String,
    },

    #[error("invalid embedding provider response ({url}, model: {model}): {detail}")]
    Format {
        url: String,
        model: String,
        detail: String,
    },

    #[error(
        "embedding provider returned {returned} vectors for {requested} inputs ({url}, model: {model})"
    )]
    CountMismatch {
        requested: usize,
        returned: usize,
        url: String,
        model: String,
    },

    #[error("data integrity error: {chunks} chunks but {embeddings} embeddings")]
    DataIntegrity { chunks: usize, embeddings: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Provider { .. } => ErrorCode::ProviderError,
            Self::Format { .. } => ErrorCode::FormatError,
            Self::CountMismatch { .. } => ErrorCode::CountMismatch,
            Self::DataIntegrity { .. } => ErrorCode::DataIntegrity,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for agents and humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Provider { url, .. } => Some(format!(
                "Is the embedding server running at {url}?\n  \
                 Start it: ollama serve\n  \
                 Or continue without vectors: --allow-empty-embeddings"
            )),

            Self::Format { .. } | Self::CountMismatch { .. } => Some(
                "The provider answered but not with the expected shape. \
                 Check that the model is an embedding model (e.g. nomic-embed-text), \
                 or pass --allow-empty-embeddings to continue without vectors."
                    .to_string(),
            ),

            Self::DataIntegrity { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint. Agents parse this instead of stderr text.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
