//! # llm-director
//!
//! Drives a text-generation provider against a set of host functions.
//!
//! The provider answers in plain text and names the functions it wants
//! as call expressions such as `add(mul(2, 3), 4)`. This crate resolves
//! those expressions against a typed [`ToolRegistry`](tool::ToolRegistry),
//! evaluates nested calls, coerces arguments to the declared parameter
//! types, runs the functions, and feeds results back until the provider
//! gives a final answer.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────────────────────┐
//!              │           Director           │  turn loop, budget, timeout
//!              └──────┬───────────────┬───────┘
//!                     │               │
//!                     ▼               ▼
//!   ┌──────────────────────┐   ┌──────────────────────┐
//!   │ OrchestrationStrategy│   │   dyn DynProvider    │
//!   │ Iterative / Template │   │  (llm-director-core) │
//!   └──────────┬───────────┘   └──────────────────────┘
//!              ▼
//!   ┌──────────────────────┐
//!   │ ToolRegistry + coerce│  resolve, bind, run, loop detection
//!   └──────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use llm_director::strategy::Iterative;
//! use llm_director::tool::{ToolError, ToolRegistry, tool_fn};
//! use llm_director::Director;
//! use llm_director_core::{DynProvider, ParamType, ToolSignature};
//!
//! # async fn example(provider: Arc<dyn DynProvider>) -> Result<(), llm_director_core::DirectorError> {
//! let mut registry = ToolRegistry::new();
//! registry.register(tool_fn(
//!     ToolSignature::new("add", "Add two integers")
//!         .param("a", ParamType::Integer)
//!         .param("b", ParamType::Integer),
//!     |args| async move { Ok::<_, ToolError>(args.i64(0)? + args.i64(1)?) },
//! ));
//!
//! let director = Director::new(provider, Arc::new(registry), Iterative::new());
//! let outcome = director.ask("What is 2 + 3?", &()).await?;
//! println!("{}", outcome.answer);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`tool`] | Handlers, the registry, call invocation and history |
//! | [`coerce`] | Argument conversion to declared parameter types |
//! | [`strategy`] | Iterative and template-fill orchestration |
//! | [`director`] | The turn loop |

#![warn(missing_docs)]

pub mod coerce;
pub mod director;
pub mod strategy;
pub mod tool;

pub use director::{Director, DirectorConfig, DirectorOutcome};
pub use strategy::{
    Action, Iterative, IterativeConfig, OrchestrationResult, OrchestrationStrategy, TemplateConfig,
    TemplateFill,
};
pub use tool::{CallHistory, CallStatus, InvokeError, ToolError, ToolRegistry, tool_fn};
