//! Call-expression parsing.
//!
//! Generated text embeds calls as plain expressions: `add(2, 3)`,
//! `outer(inner(1, 2), 3)`, `greet("Ada, Countess")`. This module splits
//! such an expression into a name and its raw top-level arguments.
//! Parsing is shallow: `inner(1, 2)` above is kept as text and only
//! evaluated later by the invoker.
//!
//! Splitting honours two kinds of nesting:
//!
//! - **Depth**: a comma inside `(...)`, `[...]` or `{...}` is not a split
//!   point.
//! - **Quotes**: a comma inside an unescaped `"..."` literal is not a split
//!   point. Each unescaped `"` toggles the quote state; `\"` does not.
//!
//! [`scan_template`] applies the same rules to find delimited expressions
//! inside free text.

use crate::chat::FunctionCall;

/// Error returned when text is not a well-formed call expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text has no opening parenthesis at all.
    #[error("expected a call like `name(args)`, found `{0}`")]
    MissingParen(String),

    /// Nothing precedes the opening parenthesis.
    #[error("call expression `{0}` has no function name")]
    EmptyName(String),

    /// The opening parenthesis is never closed.
    #[error("unbalanced parentheses in `{0}`")]
    Unbalanced(String),

    /// Non-whitespace text follows the closing parenthesis.
    #[error("unexpected `{trailing}` after call expression `{text}`")]
    TrailingInput {
        /// The full expression.
        text: String,
        /// What came after the closing parenthesis.
        trailing: String,
    },
}

/// Tracks whether the scanner is inside a `"..."` literal.
#[derive(Debug, Default)]
struct QuoteState {
    in_quote: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feeds one character. Returns true when `c` is structural, i.e. it is
    /// outside any quoted literal and is not itself a quote.
    fn step(&mut self, c: char) -> bool {
        if self.in_quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_quote = false;
            }
            false
        } else if c == '"' {
            self.in_quote = true;
            false
        } else {
            true
        }
    }
}

/// Parses `name(arg1, arg2, ...)` into a [`FunctionCall`].
///
/// The name and every argument are trimmed. `f()` has zero arguments.
///
/// ```rust
/// use llm_director_core::expr::parse_call;
///
/// let call = parse_call("f(\"a,b\", 2)").unwrap();
/// assert_eq!(call.name, "f");
/// assert_eq!(call.args, vec!["\"a,b\"", "2"]);
///
/// assert!(parse_call("foo").is_err());
/// ```
pub fn parse_call(text: &str) -> Result<FunctionCall, ParseError> {
    let text = text.trim();
    let Some(open) = text.find('(') else {
        return Err(ParseError::MissingParen(text.to_string()));
    };

    let name = text[..open].trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName(text.to_string()));
    }

    let close =
        matching_paren(text, open).ok_or_else(|| ParseError::Unbalanced(text.to_string()))?;

    let trailing = text[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(ParseError::TrailingInput {
            text: text.to_string(),
            trailing: trailing.to_string(),
        });
    }

    Ok(FunctionCall {
        name: name.to_string(),
        args: split_top_level(&text[open + 1..close]),
    })
}

/// Returns the byte index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();
    for (i, c) in text[open..].char_indices() {
        if !quotes.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits an argument list on top-level commas and trims each piece.
///
/// Blank input yields no arguments. Empty pieces between commas are kept
/// so the caller can report them.
///
/// ```rust
/// use llm_director_core::expr::split_top_level;
///
/// assert_eq!(split_top_level("inner(1, 2), 3"), vec!["inner(1, 2)", "3"]);
/// assert_eq!(split_top_level("[1, 2], \"x, y\""), vec!["[1, 2]", "\"x, y\""]);
/// assert!(split_top_level("  ").is_empty());
/// ```
pub fn split_top_level(body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if !quotes.step(c) {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(body[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(body[start..].trim().to_string());
    parts
}

/// Returns true if `text` is an identifier followed by a balanced
/// parenthesised argument list and nothing else.
///
/// Identifiers start with a letter or `_` and may contain letters, digits,
/// `_`, `.` and `:` (so `math.add(1, 2)` and `Math::max(1, 2)` qualify).
pub fn is_call_shaped(text: &str) -> bool {
    let text = text.trim();
    let Some(open) = text.find('(') else {
        return false;
    };
    let name = text[..open].trim_end();
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':')) {
        return false;
    }
    matching_paren(text, open).is_some_and(|close| close == text.len() - 1)
}

/// A piece of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied through unchanged.
    Literal(&'a str),
    /// The text between a delimiter pair, without the delimiters.
    Expr(&'a str),
}

/// Splits `text` into literal runs and delimited expressions.
///
/// Delimiters nest, and delimiter characters inside a quoted literal within
/// an expression are ignored. An opener that is never closed is literal
/// text; scanning resumes right after it, so later expressions are still
/// found.
///
/// ```rust
/// use llm_director_core::expr::{Segment, scan_template};
///
/// let segments = scan_template("The answer is {add(2,3)}.", '{', '}');
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Literal("The answer is "),
///         Segment::Expr("add(2,3)"),
///         Segment::Literal("."),
///     ]
/// );
/// ```
pub fn scan_template(text: &str, open: char, close: char) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(found) = text[pos..].find(open) {
        let body_start = pos + found + open.len_utf8();
        let Some(len) = expression_len(&text[body_start..], open, close) else {
            pos = body_start;
            continue;
        };
        let opener = pos + found;
        if opener > literal_start {
            segments.push(Segment::Literal(&text[literal_start..opener]));
        }
        segments.push(Segment::Expr(&text[body_start..body_start + len]));
        literal_start = body_start + len + close.len_utf8();
        pos = literal_start;
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }
    segments
}

/// Byte length of `body` up to the delimiter closing an already-open
/// expression, or `None` if it is never closed.
fn expression_len(body: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    let mut quotes = QuoteState::default();
    for (i, c) in body.char_indices() {
        if !quotes.step(c) {
            continue;
        }
        if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if c == open {
            depth += 1;
        }
    }
    None
}
