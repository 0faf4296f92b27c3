//! Pre-built helpers for tests.
//!
//! Available with the `test-utils` feature so downstream crates can reuse
//! them, and always compiled for this crate's own tests.

use crate::chat::{FunctionCall, Response};
use crate::mock::MockProvider;

/// A text-only [`Response`].
pub fn text_response(text: &str) -> Response {
    Response::text(text)
}

/// A [`Response`] requesting the given call expressions, in order.
///
/// # Panics
///
/// Panics if an expression does not parse.
pub fn call_response(exprs: &[&str]) -> Response {
    Response::with_calls(exprs.iter().map(|e| call(e)).collect())
}

/// Parses a call expression, panicking on malformed input.
pub fn call(expr: &str) -> FunctionCall {
    expr.parse()
        .unwrap_or_else(|e| panic!("test call `{expr}` should parse: {e}"))
}

/// A [`MockProvider`] with the given responses already queued.
pub fn mock_with(responses: Vec<Response>) -> MockProvider {
    let mock = MockProvider::new();
    for response in responses {
        mock.queue_response(response);
    }
    mock
}
