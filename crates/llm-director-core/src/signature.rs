//! Declared tool signatures.
//!
//! A [`ToolSignature`] is the plain data a host registers for each tool:
//! its name, a description for the model, and an ordered parameter list
//! with a declared [`ParamType`] per parameter. Signatures are built once
//! at setup and never change afterwards.
//!
//! ```rust
//! use llm_director_core::{ParamType, ToolSignature};
//!
//! let sig = ToolSignature::new("sum", "Adds any number of integers")
//!     .vararg("values", ParamType::Integer);
//! assert_eq!(sig.to_string(), "sum(values: Int...)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "lowercase")]
pub enum ParamType {
    /// A signed 64-bit integer.
    Integer,
    /// A 64-bit float.
    Float,
    /// `true` / `false`.
    Boolean,
    /// Exactly one character.
    Char,
    /// Free text.
    String,
    /// A list of values of the element type.
    Array(Box<ParamType>),
    /// Zero or more trailing arguments of the element type, collected into a
    /// list. Only meaningful as the last parameter.
    Vararg(Box<ParamType>),
}

impl ParamType {
    /// Shorthand for `Array(elem)`.
    pub fn array(elem: ParamType) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Shorthand for `Vararg(elem)`.
    pub fn vararg(elem: ParamType) -> Self {
        Self::Vararg(Box::new(elem))
    }

    /// The element type for list-like parameters.
    pub fn element(&self) -> Option<&ParamType> {
        match self {
            Self::Array(elem) | Self::Vararg(elem) => Some(elem),
            _ => None,
        }
    }

    /// Returns true for `Array` and `Vararg`.
    pub fn is_list(&self) -> bool {
        self.element().is_some()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("Int"),
            Self::Float => f.write_str("Float"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Char => f.write_str("Char"),
            Self::String => f.write_str("String"),
            Self::Array(elem) => write!(f, "Array<{elem}>"),
            Self::Vararg(elem) => write!(f, "{elem}..."),
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, used in error messages and advertisements.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A tool's name, description and ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSignature {
    /// The name the provider uses to call the tool.
    pub name: String,
    /// What the tool does, shown to the provider.
    pub description: String,
    /// Parameters in positional order.
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl ToolSignature {
    /// Creates a signature with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            ty,
            description: None,
        });
        self
    }

    /// Appends a parameter with a description.
    #[must_use]
    pub fn param_with_doc(
        mut self,
        name: impl Into<String>,
        ty: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            ty,
            description: Some(description.into()),
        });
        self
    }

    /// Appends a trailing variable-length parameter of `elem` values.
    #[must_use]
    pub fn vararg(self, name: impl Into<String>, elem: ParamType) -> Self {
        self.param(name, ParamType::vararg(elem))
    }

    /// Returns true if the last parameter is a vararg.
    pub fn has_vararg(&self) -> bool {
        self.params
            .last()
            .is_some_and(|p| matches!(p.ty, ParamType::Vararg(_)))
    }

    /// Returns true if a `Vararg` appears anywhere but last.
    pub fn has_misplaced_vararg(&self) -> bool {
        let fixed = self.params.len().saturating_sub(1);
        self.params[..fixed]
            .iter()
            .any(|p| matches!(p.ty, ParamType::Vararg(_)))
    }

    /// Number of arguments the signature requires: every parameter except a
    /// trailing vararg.
    pub fn required_args(&self) -> usize {
        if self.has_vararg() {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }

    /// Returns true if `count` positional arguments fit this signature.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.has_vararg() {
            count >= self.required_args()
        } else {
            count == self.params.len()
        }
    }
}

impl fmt::Display for ToolSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", p.name, p.ty)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> ToolSignature {
        ToolSignature::new("add", "Add two integers")
            .param("a", ParamType::Integer)
            .param("b", ParamType::Integer)
    }

    #[test]
    fn test_display() {
        assert_eq!(add().to_string(), "add(a: Int, b: Int)");
        let sig = ToolSignature::new("join", "Join strings")
            .param("sep", ParamType::Char)
            .param("parts", ParamType::array(ParamType::String));
        assert_eq!(sig.to_string(), "join(sep: Char, parts: Array<String>)");
    }

    #[test]
    fn test_arity_fixed() {
        let sig = add();
        assert!(!sig.has_vararg());
        assert_eq!(sig.required_args(), 2);
        assert!(sig.accepts_arity(2));
        assert!(!sig.accepts_arity(1));
        assert!(!sig.accepts_arity(3));
    }

    #[test]
    fn test_arity_vararg() {
        let sig = ToolSignature::new("log", "Log values")
            .param("level", ParamType::String)
            .vararg("values", ParamType::Float);
        assert!(sig.has_vararg());
        assert_eq!(sig.required_args(), 1);
        assert!(sig.accepts_arity(1));
        assert!(sig.accepts_arity(5));
        assert!(!sig.accepts_arity(0));
    }

    #[test]
    fn test_misplaced_vararg() {
        let sig = ToolSignature::new("bad", "")
            .vararg("xs", ParamType::Integer)
            .param("y", ParamType::Integer);
        assert!(sig.has_misplaced_vararg());
        assert!(!add().has_misplaced_vararg());
        assert!(!ToolSignature::new("none", "").has_misplaced_vararg());
    }

    #[test]
    fn test_param_type_element() {
        assert_eq!(
            ParamType::array(ParamType::Integer).element(),
            Some(&ParamType::Integer)
        );
        assert!(ParamType::vararg(ParamType::Char).is_list());
        assert!(!ParamType::Float.is_list());
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let sig = ToolSignature::new("sum", "Sum").vararg("xs", ParamType::Integer);
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(json["params"][0]["type"]["type"], "vararg");
        assert_eq!(json["params"][0]["type"]["of"]["type"], "integer");
        let back: ToolSignature = serde_json::from_value(json).unwrap();
        assert_eq!(back, sig);
    }
}
