//! Tool and invocation error types.

use crate::coerce::CoercionError;

/// Error returned by a tool body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Human-readable error description.
    pub message: String,
}

impl ToolError {
    /// Creates a new tool error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a call could not produce a result.
///
/// Every variant is recoverable from the caller's point of view: the
/// iterative strategy turns it into a corrective message, the template
/// strategy surfaces it as a terminal failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// No registered tool has this name.
    #[error("unknown function `{name}`")]
    Unresolved {
        /// The name that was called.
        name: String,
    },

    /// The argument count does not fit the signature.
    #[error("`{name}` expects {expected} argument(s), got {found}")]
    Arity {
        /// The tool name.
        name: String,
        /// Human-readable expected count, such as `2` or `at least 1`.
        expected: String,
        /// Number of arguments supplied.
        found: usize,
    },

    /// An argument could not be converted to its declared type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// The tool body itself failed.
    #[error("`{name}` failed: {source}")]
    Tool {
        /// The tool name.
        name: String,
        /// The error the tool returned.
        #[source]
        source: ToolError,
    },

    /// Calls were nested deeper than the evaluator allows.
    #[error("calls nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit.
        limit: usize,
    },
}

impl InvokeError {
    /// Returns true if the call named a function that does not exist.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = InvokeError::Arity {
            name: "add".into(),
            expected: "2".into(),
            found: 3,
        };
        assert_eq!(err.to_string(), "`add` expects 2 argument(s), got 3");

        let err = InvokeError::Tool {
            name: "div".into(),
            source: ToolError::new("division by zero"),
        };
        assert_eq!(err.to_string(), "`div` failed: division by zero");
    }

    #[test]
    fn test_is_unresolved() {
        let err = InvokeError::NestingTooDeep { limit: 16 };
        assert!(!err.is_unresolved());
        assert!(
            InvokeError::Unresolved {
                name: "x".into()
            }
            .is_unresolved()
        );
    }
}
