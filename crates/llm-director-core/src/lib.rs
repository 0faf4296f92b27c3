//! # llm-director-core
//!
//! Shared vocabulary for driving a text-generation service against a set of
//! host functions: messages, parsed call expressions, tool signatures,
//! conversation state, and the provider trait.
//!
//! This crate contains no orchestration logic and no transport code.
//! Strategies, the tool registry and the turn loop live in `llm-director`;
//! concrete providers implement [`Provider`] in their own crates.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chat`] | Messages, parsed calls, provider responses |
//! | [`expr`] | Call-expression parser and template scanner |
//! | [`argument`] | Shape classification of raw arguments |
//! | [`signature`] | Declared tool signatures and parameter types |
//! | [`conversation`] | Append-only, resettable message log |
//! | [`provider`] | The [`Provider`] collaborator trait |
//! | [`error`] | Unified [`DirectorError`] |

#![warn(missing_docs)]

pub mod argument;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod expr;
pub mod provider;
pub mod signature;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

pub use argument::ParsedArgument;
pub use chat::{ChatMessage, ChatRole, FunctionCall, Response};
pub use conversation::Conversation;
pub use error::DirectorError;
pub use expr::{ParseError, parse_call};
pub use provider::{DynProvider, Provider, ProviderMetadata};
pub use signature::{ParamSpec, ParamType, ToolSignature};
