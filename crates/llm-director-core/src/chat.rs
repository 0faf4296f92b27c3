//! Conversation messages, parsed calls, and provider responses.
//!
//! These are the values that flow between a provider and the
//! orchestration strategies. A [`Response`] is what a provider hands back
//! after one turn; its [`FunctionCall`]s are already split into a name and
//! raw argument text, but nothing has been evaluated yet. Strategies turn
//! those calls into [`ChatMessage`]s that are appended to the
//! [`Conversation`](crate::conversation::Conversation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::expr::{ParseError, parse_call};

/// The author of a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions and corrective notes from the host.
    System,
    /// The human (or calling program) asking for an answer.
    User,
    /// The text-generation service.
    Assistant,
    /// The result of a host function invocation.
    Tool,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        };
        f.write_str(name)
    }
}

/// A single message in a conversation thread.
///
/// Tool messages also carry the canonical key of the call that produced
/// them, so a provider can correlate results with its own requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Canonical call key for [`ChatRole::Tool`] messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
}

impl ChatMessage {
    /// Creates a message with the given role and no call key.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            call: None,
        }
    }

    /// Shorthand for a [`ChatRole::System`] message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Shorthand for a [`ChatRole::User`] message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Shorthand for a [`ChatRole::Assistant`] message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// A tool result for the call identified by `call_key`.
    pub fn tool_result(call_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            call: Some(call_key.into()),
        }
    }

    /// Returns true if this message was written by `role`.
    pub fn is(&self, role: ChatRole) -> bool {
        self.role == role
    }
}

/// A call expression split into its name and raw top-level arguments.
///
/// Arguments are kept as trimmed source text. Nested calls such as
/// `inner(1, 2)` stay unevaluated until the invoker reaches them.
///
/// ```rust
/// use llm_director_core::FunctionCall;
///
/// let call: FunctionCall = "outer(inner(1, 2), 3)".parse().unwrap();
/// assert_eq!(call.name, "outer");
/// assert_eq!(call.args, vec!["inner(1, 2)", "3"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The function name, trimmed.
    pub name: String,
    /// Raw argument substrings, trimmed, in source order.
    pub args: Vec<String>,
}

impl FunctionCall {
    /// Builds a call from a name and raw argument strings.
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromStr for FunctionCall {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_call(s)
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

/// What a provider returned for one turn.
///
/// `calls` must be in the order the provider emitted them; strategies
/// process them strictly in that order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Generated text. May be empty when the provider only requested calls.
    pub text: String,
    /// Requested function calls, in emission order.
    #[serde(default)]
    pub calls: Vec<FunctionCall>,
}

impl Response {
    /// A response carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Vec::new(),
        }
    }

    /// A response carrying only calls.
    pub fn with_calls(calls: Vec<FunctionCall>) -> Self {
        Self {
            text: String::new(),
            calls,
        }
    }

    /// Returns true if the provider requested at least one call.
    pub fn has_calls(&self) -> bool {
        !self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(ChatRole::System.to_string(), "system");
        assert_eq!(ChatRole::Tool.to_string(), "tool");
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::user("hi").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("hi").role, ChatRole::Assistant);
        let msg = ChatMessage::tool_result("add(2, 3)", "5");
        assert!(msg.is(ChatRole::Tool));
        assert_eq!(msg.call.as_deref(), Some("add(2, 3)"));
        assert_eq!(msg.content, "5");
    }

    #[test]
    fn test_message_serde_skips_empty_call() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "system", "content": "be brief"})
        );
    }

    #[test]
    fn test_function_call_display() {
        let call = FunctionCall::new("add", ["2", "3"]);
        assert_eq!(call.to_string(), "add(2, 3)");
        assert_eq!(FunctionCall::new("now", Vec::<String>::new()).to_string(), "now()");
    }

    #[test]
    fn test_function_call_from_str() {
        let call: FunctionCall = "f(\"a,b\", 2)".parse().unwrap();
        assert_eq!(call.args, vec!["\"a,b\"", "2"]);
        assert!("foo".parse::<FunctionCall>().is_err());
    }

    #[test]
    fn test_response_helpers() {
        assert!(!Response::text("done").has_calls());
        let resp = Response::with_calls(vec![FunctionCall::new("add", ["1", "2"])]);
        assert!(resp.has_calls());
        assert!(resp.text.is_empty());
    }
}
