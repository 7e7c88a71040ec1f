use thiserror::Error;

/// Unified error type for the entire expense-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The store collapses these to their `Display` text when recording
/// `last_error`, so messages are written to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    /// Display is the message alone so a backend's `{error}` text reaches
    /// the user verbatim; the status stays available through [`status`](Self::status).
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Input / Setup ───────────────────────────────────────────────
    #[error("Transaction validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CoreError {
    /// The HTTP status for `Api` errors, `None` for everything else.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CoreError::Deserialization(e.to_string())
        } else {
            CoreError::Network(e.to_string())
        }
    }
}
