//! Unified error type for director runs.
//!
//! Provider implementations map their transport failures into
//! [`DirectorError`], and the director reports run-level failures through
//! the same type. Per-call failures (bad arguments, unknown tools, tool
//! errors) never surface here directly: strategies turn them into
//! corrective conversation messages instead. Only a template-fill failure,
//! which has no retry path, is wrapped in [`DirectorError::Invocation`].
//!
//! ```rust
//! use llm_director_core::DirectorError;
//!
//! let err = DirectorError::Timeout { elapsed_ms: 5000 };
//! assert!(err.is_retryable());
//! ```

/// The error type returned by providers and the director loop.
///
/// Variants are `#[non_exhaustive]`; match with a wildcard arm.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DirectorError {
    /// The provider could not produce a response.
    #[error("Provider error: {message}")]
    Provider {
        /// Human-readable description.
        message: String,
        /// Whether another turn may succeed.
        retryable: bool,
    },

    /// The provider returned something the caller could not interpret.
    #[error("Response format error: {message}")]
    ResponseFormat {
        /// What went wrong.
        message: String,
        /// The raw payload, for diagnostics.
        raw: String,
    },

    /// A provider round-trip or a whole run exceeded its deadline.
    #[error("Operation timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds elapsed before the timeout fired.
        elapsed_ms: u64,
    },

    /// A call could not be evaluated and the strategy has no retry path.
    #[error("Invocation failed: {0}")]
    Invocation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The caller's turn budget ran out before a final answer.
    #[error("No final answer after {turns} turns{}", last_error_suffix(.last_error.as_deref()))]
    TurnBudgetExhausted {
        /// How many turns were taken.
        turns: u32,
        /// The most recent failure, if any turn failed.
        last_error: Option<String>,
    },
}

impl DirectorError {
    /// Returns `true` if the failure is transient and another turn may
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { retryable, .. } => *retryable,
            Self::Timeout { .. } | Self::ResponseFormat { .. } => true,
            _ => false,
        }
    }
}

fn last_error_suffix(last_error: Option<&str>) -> String {
    last_error
        .map(|e| format!(" (last error: {e})"))
        .unwrap_or_default()
}

impl From<serde_json::Error> for DirectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseFormat {
            message: err.to_string(),
            raw: String::new(),
        }
    }
}
