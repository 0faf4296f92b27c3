//! Coerced arguments handed to a tool body.

use serde_json::Value;

use super::ToolError;

/// Positional arguments after coercion, one value per declared parameter.
///
/// A trailing vararg parameter arrives as a single array value. The typed
/// accessors return a [`ToolError`] on a missing index or a type mismatch,
/// so tool bodies can use `?` throughout:
///
/// ```rust
/// use llm_director::tool::{ToolArgs, ToolError};
/// use serde_json::json;
///
/// fn add(args: &ToolArgs) -> Result<i64, ToolError> {
///     Ok(args.i64(0)? + args.i64(1)?)
/// }
///
/// let args = ToolArgs::new(vec![json!(2), json!(3)]);
/// assert_eq!(add(&args).unwrap(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: Vec<Value>,
}

impl ToolArgs {
    /// Wraps already-coerced values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of positional values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at `idx`.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// All values in parameter order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the arguments, returning the values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn require(&self, idx: usize) -> Result<&Value, ToolError> {
        self.values
            .get(idx)
            .ok_or_else(|| ToolError::new(format!("missing argument {idx}")))
    }

    fn mismatch(idx: usize, expected: &str, found: &Value) -> ToolError {
        ToolError::new(format!("argument {idx}: expected {expected}, found {found}"))
    }

    /// The integer at `idx`.
    pub fn i64(&self, idx: usize) -> Result<i64, ToolError> {
        let v = self.require(idx)?;
        v.as_i64().ok_or_else(|| Self::mismatch(idx, "an integer", v))
    }

    /// The number at `idx`. Integers are widened.
    pub fn f64(&self, idx: usize) -> Result<f64, ToolError> {
        let v = self.require(idx)?;
        v.as_f64().ok_or_else(|| Self::mismatch(idx, "a number", v))
    }

    /// The boolean at `idx`.
    pub fn bool(&self, idx: usize) -> Result<bool, ToolError> {
        let v = self.require(idx)?;
        v.as_bool().ok_or_else(|| Self::mismatch(idx, "a boolean", v))
    }

    /// The text at `idx`. Also used for `Char` parameters.
    pub fn str(&self, idx: usize) -> Result<&str, ToolError> {
        let v = self.require(idx)?;
        v.as_str().ok_or_else(|| Self::mismatch(idx, "text", v))
    }

    /// The array (or vararg group) at `idx`.
    pub fn list(&self, idx: usize) -> Result<&[Value], ToolError> {
        let v = self.require(idx)?;
        v.as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Self::mismatch(idx, "an array", v))
    }

    /// The array at `idx` as integers.
    pub fn i64_list(&self, idx: usize) -> Result<Vec<i64>, ToolError> {
        self.list(idx)?
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| Self::mismatch(idx, "integers", v)))
            .collect()
    }

    /// The array at `idx` as numbers.
    pub fn f64_list(&self, idx: usize) -> Result<Vec<f64>, ToolError> {
        self.list(idx)?
            .iter()
            .map(|v| v.as_f64().ok_or_else(|| Self::mismatch(idx, "numbers", v)))
            .collect()
    }
}

impl From<Vec<Value>> for ToolArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
