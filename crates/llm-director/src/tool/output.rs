//! Tool output types.

use serde_json::Value;

/// Output returned by a tool handler.
///
/// `content` is the textual result recorded in the call history and shown
/// to the model. Most tools return a `String` or a number and let the
/// `From` impls build this.
///
/// # Example
///
/// ```rust
/// use llm_director::tool::ToolOutput;
/// use serde_json::json;
///
/// assert_eq!(ToolOutput::from(5_i64).content, "5");
/// assert_eq!(ToolOutput::from(json!("plain")).content, "plain");
/// assert_eq!(ToolOutput::from(json!([1, 2])).content, "[1,2]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// The textual result.
    pub content: String,
}

impl ToolOutput {
    /// Creates a new tool output with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl From<String> for ToolOutput {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ToolOutput {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<i64> for ToolOutput {
    fn from(n: i64) -> Self {
        Self::new(n.to_string())
    }
}

impl From<f64> for ToolOutput {
    fn from(n: f64) -> Self {
        Self::new(n.to_string())
    }
}

impl From<bool> for ToolOutput {
    fn from(b: bool) -> Self {
        Self::new(b.to_string())
    }
}

/// Strings are used as-is; every other value is rendered as compact JSON.
impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::new(s),
            other => Self::new(other.to_string()),
        }
    }
}
