//! Conversion of classified arguments into typed values.
//!
//! [`coerce`] takes a [`ParsedArgument`] whose nested calls have already
//! been evaluated and converts it to the [`ParamType`] a tool declared.
//! Values are represented as [`serde_json::Value`], which is also what the
//! canonical call key is rendered from.
//!
//! | Declared type | Accepts |
//! |---------------|---------|
//! | `Integer` | integral numbers, or text that parses as `i64` |
//! | `Float` | any number, or text that parses as `f64` |
//! | `Boolean` | `true` / `false` in any case |
//! | `Char` | exactly one character |
//! | `String` | any scalar, rendered as text |
//! | `Array` / `Vararg` | a group, bare comma-separated text (optionally bracketed), or a single scalar |
//!
//! A quoted literal is always one scalar. `"a, b"` fills an `Array(String)`
//! parameter as the single element `a, b`.

use llm_director_core::expr::split_top_level;
use llm_director_core::{ParamType, ParsedArgument};
use serde_json::{Number, Value};

/// An argument could not be converted to its parameter's declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert `{raw}` to {expected} for parameter `{param}`: {reason}")]
pub struct CoercionError {
    /// The parameter being filled.
    pub param: String,
    /// The declared type.
    pub expected: ParamType,
    /// The argument as written.
    pub raw: String,
    /// Why conversion failed.
    pub reason: String,
}

/// Converts `arg` to `ty` for the parameter named `param`.
///
/// `arg` must not contain unevaluated calls; the invoker resolves those
/// first. A leftover [`ParsedArgument::Call`] is rejected.
///
/// ```rust
/// use llm_director::coerce::coerce;
/// use llm_director_core::{ParamType, ParsedArgument};
/// use serde_json::json;
///
/// let arg = ParsedArgument::classify("[1, 2, 3]");
/// let value = coerce(&arg, &ParamType::array(ParamType::Integer), "xs").unwrap();
/// assert_eq!(value, json!([1, 2, 3]));
/// ```
pub fn coerce(arg: &ParsedArgument, ty: &ParamType, param: &str) -> Result<Value, CoercionError> {
    let fail = |reason: String| CoercionError {
        param: param.to_string(),
        expected: ty.clone(),
        raw: arg.to_text(),
        reason,
    };

    if let ParsedArgument::Call(call) = arg {
        return Err(fail(format!("call `{}` was not evaluated", call.name)));
    }

    match ty {
        ParamType::Integer => match arg {
            ParsedArgument::Number(n) => n
                .as_i64()
                .map(Value::from)
                .ok_or_else(|| fail("not a 64-bit integer".into())),
            ParsedArgument::Quoted(s) | ParsedArgument::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| fail(e.to_string())),
            other => Err(fail(format!("expected an integer, found a {}", other.kind()))),
        },

        ParamType::Float => {
            let parsed = match arg {
                ParsedArgument::Number(n) => n.as_f64(),
                ParsedArgument::Quoted(s) | ParsedArgument::Str(s) => {
                    s.trim().parse::<f64>().ok()
                }
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| fail(format!("expected a finite number, found a {}", arg.kind())))
        }

        ParamType::Boolean => match arg {
            ParsedArgument::Boolean(b) => Ok(Value::Bool(*b)),
            ParsedArgument::Quoted(s) | ParsedArgument::Str(s) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
                t if t.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
                _ => Err(fail("expected true or false".into())),
            },
            other => Err(fail(format!("expected true or false, found a {}", other.kind()))),
        },

        ParamType::Char => {
            let text = match arg {
                ParsedArgument::Quoted(s) | ParsedArgument::Str(s) => s.clone(),
                ParsedArgument::Number(n) => n.to_string(),
                other => return Err(fail(format!("expected a character, found a {}", other.kind()))),
            };
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::String(c.to_string())),
                _ => Err(fail(format!("expected one character, found {}", text.chars().count()))),
            }
        }

        ParamType::String => match arg {
            ParsedArgument::Varargs(_) => Err(fail("expected text, found a group".into())),
            scalar => Ok(Value::String(scalar.to_text())),
        },

        ParamType::Array(elem) | ParamType::Vararg(elem) => {
            let items = match arg {
                ParsedArgument::Varargs(items) => items
                    .iter()
                    .map(|item| coerce(item, elem, param))
                    .collect::<Result<Vec<_>, _>>()?,
                ParsedArgument::Str(s) => {
                    let body = s.trim();
                    let body = body
                        .strip_prefix('[')
                        .and_then(|b| b.strip_suffix(']'))
                        .unwrap_or(body);
                    split_top_level(body)
                        .iter()
                        .map(|piece| coerce(&ParsedArgument::literal(piece), elem, param))
                        .collect::<Result<Vec<_>, _>>()?
                }
                scalar => vec![coerce(scalar, elem, param)?],
            };
            Ok(Value::Array(items))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn c(raw: &str, ty: &ParamType) -> Result<Value, CoercionError> {
        coerce(&ParsedArgument::classify(raw), ty, "p")
    }

    #[test]
    fn test_integer() {
        assert_eq!(c("42", &ParamType::Integer).unwrap(), json!(42));
        assert_eq!(c("-7", &ParamType::Integer).unwrap(), json!(-7));
        assert_eq!(c("\"12\"", &ParamType::Integer).unwrap(), json!(12));
    }

    #[test]
    fn test_integer_rejects_fraction_and_text() {
        let err = c("1.5", &ParamType::Integer).unwrap_err();
        assert_eq!(err.param, "p");
        assert_eq!(err.expected, ParamType::Integer);
        assert_eq!(err.raw, "1.5");
        assert!(c("abc", &ParamType::Integer).is_err());
        assert!(c("true", &ParamType::Integer).is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(c("2.5", &ParamType::Float).unwrap(), json!(2.5));
        assert_eq!(c("3", &ParamType::Float).unwrap(), json!(3.0));
        assert_eq!(c("\"1e2\"", &ParamType::Float).unwrap(), json!(100.0));
        assert!(c("NaN", &ParamType::Float).is_err());
        assert!(c("[1]", &ParamType::Float).is_err());
    }

    #[test]
    fn test_boolean() {
        assert_eq!(c("TRUE", &ParamType::Boolean).unwrap(), json!(true));
        assert_eq!(c("\"false\"", &ParamType::Boolean).unwrap(), json!(false));
        assert!(c("yes", &ParamType::Boolean).is_err());
        assert!(c("1", &ParamType::Boolean).is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(c("'x'", &ParamType::Char).unwrap(), json!("x"));
        assert_eq!(c("7", &ParamType::Char).unwrap(), json!("7"));
        assert_eq!(c("\"é\"", &ParamType::Char).unwrap(), json!("é"));
        assert!(c("\"xy\"", &ParamType::Char).is_err());
        assert!(c("\"\"", &ParamType::Char).is_err());
    }

    #[test]
    fn test_string_accepts_scalars() {
        assert_eq!(c("\"a,b\"", &ParamType::String).unwrap(), json!("a,b"));
        assert_eq!(c("hello", &ParamType::String).unwrap(), json!("hello"));
        assert_eq!(c("12", &ParamType::String).unwrap(), json!("12"));
        assert_eq!(c("true", &ParamType::String).unwrap(), json!("true"));
        assert!(c("[1, 2]", &ParamType::String).is_err());
    }

    #[test]
    fn test_array_from_group() {
        let ty = ParamType::array(ParamType::Integer);
        assert_eq!(c("[1, 2, 3]", &ty).unwrap(), json!([1, 2, 3]));
        assert_eq!(c("[]", &ty).unwrap(), json!([]));
    }

    #[test]
    fn test_array_from_text() {
        let ty = ParamType::array(ParamType::Integer);
        let arg = ParsedArgument::Str("[4, 5]".into());
        assert_eq!(coerce(&arg, &ty, "xs").unwrap(), json!([4, 5]));
        let arg = ParsedArgument::Str("6, 7".into());
        assert_eq!(coerce(&arg, &ty, "xs").unwrap(), json!([6, 7]));
    }

    #[test]
    fn test_quoted_literal_is_one_array_element() {
        let ty = ParamType::array(ParamType::String);
        assert_eq!(c("\"a, b\"", &ty).unwrap(), json!(["a, b"]));
        assert_eq!(c("[\"a, b\", c]", &ty).unwrap(), json!(["a, b", "c"]));
        let ty = ParamType::vararg(ParamType::String);
        assert_eq!(c("\"x, y\"", &ty).unwrap(), json!(["x, y"]));
    }

    #[test]
    fn test_deep_group_is_rejected() {
        let raw = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
        for ty in [
            ParamType::String,
            ParamType::array(ParamType::String),
            ParamType::array(ParamType::array(ParamType::Integer)),
        ] {
            assert!(c(&raw, &ty).is_err());
        }
    }

    #[test]
    fn test_array_from_single_scalar() {
        let ty = ParamType::array(ParamType::Float);
        assert_eq!(c("2", &ty).unwrap(), json!([2.0]));
    }

    #[test]
    fn test_array_element_error() {
        let ty = ParamType::array(ParamType::Integer);
        let err = c("[1, \"two\"]", &ty).unwrap_err();
        assert_eq!(err.expected, ParamType::Integer);
        assert_eq!(err.raw, "two");
    }

    #[test]
    fn test_nested_arrays() {
        let ty = ParamType::array(ParamType::array(ParamType::Integer));
        assert_eq!(c("[[1, 2], [3]]", &ty).unwrap(), json!([[1, 2], [3]]));
    }

    #[test]
    fn test_unevaluated_call_rejected() {
        let err = c("inner(1)", &ParamType::Integer).unwrap_err();
        assert!(err.reason.contains("not evaluated"));
    }
}
