//! Tool registration and invocation.
//!
//! # Architecture
//!
//! ```text
//!   ToolHandler        : one host function (signature + execute fn)
//!       │
//!   ToolRegistry       : handlers by name; resolves, binds and runs calls
//!       │
//!   CallHistory        : completed calls of one attempt, for loop detection
//! ```
//!
//! # Example
//!
//! ```rust
//! use llm_director::tool::{CallHistory, CallStatus, ToolError, ToolRegistry, tool_fn};
//! use llm_director_core::{FunctionCall, ParamType, ToolSignature};
//!
//! # async fn example() {
//! let mut registry: ToolRegistry = ToolRegistry::new();
//! registry.register(tool_fn(
//!     ToolSignature::new("add", "Add two integers")
//!         .param("a", ParamType::Integer)
//!         .param("b", ParamType::Integer),
//!     |args| async move { Ok::<_, ToolError>(args.i64(0)? + args.i64(1)?) },
//! ));
//!
//! let mut history = CallHistory::new();
//! let call: FunctionCall = "add(add(1, 1), 3)".parse().unwrap();
//! let status = registry.invoke(&call, &mut history, &()).await;
//! assert!(matches!(status, CallStatus::Success { ref result, .. } if result == "5"));
//!
//! // The same call again is reported, not executed.
//! let status = registry.invoke(&call, &mut history, &()).await;
//! assert!(matches!(status, CallStatus::Recalled { .. }));
//! # }
//! ```
//!
//! # Using Context
//!
//! Tools that need shared state receive it through the `Ctx` parameter.
//! Use [`tool_fn_with_ctx`] and copy what the tool needs out of the
//! context before the `async move` block.

mod args;
mod error;
mod handler;
mod helpers;
mod history;
mod invoker;
mod output;
mod registry;

pub use args::ToolArgs;
pub use error::{InvokeError, ToolError};
pub use handler::{BlockingToolHandler, FnToolHandler, NoCtxToolHandler, ToolFuture, ToolHandler};
pub use helpers::{tool_fn, tool_fn_blocking, tool_fn_with_ctx};
pub use history::{CallHistory, CallRecord, canonical_key};
pub use invoker::{CallStatus, MAX_NESTING};
pub use output::ToolOutput;
pub use registry::ToolRegistry;

#[cfg(test)]
mod tests;
