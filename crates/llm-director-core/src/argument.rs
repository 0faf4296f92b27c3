//! Classification of raw argument text.

use serde_json::Number;

use crate::chat::FunctionCall;
use crate::expr::{is_call_shaped, parse_call, split_top_level};

/// Deepest `[...]` group nesting that is classified structurally.
///
/// A group below this depth is kept as bare [`ParsedArgument::Str`] text,
/// which no declared type accepts as a nested list.
pub const MAX_GROUP_DEPTH: usize = 16;

/// A raw argument sorted into the shape it was written in.
///
/// Classification never consults parameter types; that is the coercer's
/// job. A [`Call`](Self::Call) is only parsed, not evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedArgument {
    /// A JSON-style numeric literal (`42`, `-1.5`, `2e3`).
    Number(Number),
    /// `true` or `false`, any case.
    Boolean(bool),
    /// A quoted literal with quotes removed and escapes resolved. Always a
    /// single value: commas inside it never separate list elements.
    Quoted(String),
    /// Bare text that is not any other shape.
    Str(String),
    /// A call expression awaiting evaluation.
    Call(FunctionCall),
    /// A bracketed group `[a, b, c]`.
    Varargs(Vec<ParsedArgument>),
}

impl ParsedArgument {
    /// Classifies `raw`, recognising nested call expressions.
    ///
    /// ```rust
    /// use llm_director_core::ParsedArgument;
    ///
    /// assert_eq!(ParsedArgument::classify("true"), ParsedArgument::Boolean(true));
    /// assert!(matches!(ParsedArgument::classify("inner(1, 2)"), ParsedArgument::Call(_)));
    /// assert_eq!(
    ///     ParsedArgument::classify("\"a,b\""),
    ///     ParsedArgument::Quoted("a,b".into())
    /// );
    /// ```
    pub fn classify(raw: &str) -> Self {
        Self::classify_at(raw, true, 0)
    }

    /// Classifies `raw` without treating call-shaped text as a call.
    ///
    /// Used for the results of nested calls, which are values and must not
    /// be evaluated again.
    pub fn literal(raw: &str) -> Self {
        Self::classify_at(raw, false, 0)
    }

    fn classify_at(raw: &str, calls: bool, depth: usize) -> Self {
        let raw = raw.trim();
        if calls && is_call_shaped(raw) {
            if let Ok(call) = parse_call(raw) {
                return Self::Call(call);
            }
        }
        if let Some(inner) = unquote(raw) {
            return Self::Quoted(inner);
        }
        if raw.eq_ignore_ascii_case("true") {
            return Self::Boolean(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Boolean(false);
        }
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            if depth >= MAX_GROUP_DEPTH {
                return Self::Str(raw.to_string());
            }
            return Self::Varargs(
                split_top_level(inner)
                    .iter()
                    .map(|s| Self::classify_at(s, calls, depth + 1))
                    .collect(),
            );
        }
        if let Ok(n) = serde_json::from_str::<Number>(raw) {
            return Self::Number(n);
        }
        Self::Str(raw.to_string())
    }

    /// The argument rendered back as plain text (no quotes).
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Quoted(s) | Self::Str(s) => s.clone(),
            Self::Call(call) => call.to_string(),
            Self::Varargs(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_text).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// A short name for the shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Quoted(_) | Self::Str(_) => "string",
            Self::Call(_) => "call",
            Self::Varargs(_) => "group",
        }
    }
}

/// Strips matching `"..."` or `'...'` quotes and resolves backslash escapes.
fn unquote(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    if raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }
    let inner = &raw[1..raw.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Some(out)
}
