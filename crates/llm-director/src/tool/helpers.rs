//! Constructors that wrap closures as tool handlers.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use llm_director_core::ToolSignature;

use super::{BlockingToolHandler, FnToolHandler, NoCtxToolHandler, ToolArgs, ToolError, ToolOutput};

/// Wraps an async closure as a tool that ignores context.
///
/// ```rust
/// use llm_director::tool::{ToolError, ToolRegistry, tool_fn};
/// use llm_director_core::{ParamType, ToolSignature};
///
/// let mut registry: ToolRegistry = ToolRegistry::new();
/// registry.register(tool_fn(
///     ToolSignature::new("add", "Add two integers")
///         .param("a", ParamType::Integer)
///         .param("b", ParamType::Integer),
///     |args| async move { Ok::<_, ToolError>(args.i64(0)? + args.i64(1)?) },
/// ));
/// assert!(registry.contains("add"));
/// ```
pub fn tool_fn<F, Fut, O>(signature: ToolSignature, handler: F) -> NoCtxToolHandler<F>
where
    F: Fn(ToolArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    NoCtxToolHandler { signature, handler }
}

/// Wraps an async closure that receives the caller's context.
///
/// The returned future must be `'static`, so copy what you need out of the
/// context before the `async move` block.
pub fn tool_fn_with_ctx<Ctx, F, Fut, O>(signature: ToolSignature, handler: F) -> FnToolHandler<Ctx, F>
where
    Ctx: Send + Sync + 'static,
    F: for<'c> Fn(ToolArgs, &'c Ctx) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    FnToolHandler {
        signature,
        handler,
        _ctx: PhantomData,
    }
}

/// Wraps a synchronous function that runs on the blocking thread pool.
pub fn tool_fn_blocking<F, O>(signature: ToolSignature, handler: F) -> BlockingToolHandler<F>
where
    F: Fn(ToolArgs) -> Result<O, ToolError> + Send + Sync + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    BlockingToolHandler {
        signature,
        handler: Arc::new(handler),
    }
}
