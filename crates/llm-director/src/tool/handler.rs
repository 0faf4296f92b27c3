//! Tool handler trait and implementations.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use llm_director_core::ToolSignature;

use super::{ToolArgs, ToolError, ToolOutput};

/// Boxed future returned by [`ToolHandler::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolOutput, ToolError>> + Send + 'a>>;

/// A single host function the model can call.
///
/// Implement this trait for tools that carry state. For simple tools, use
/// [`super::tool_fn`] to wrap a closure.
///
/// The trait is generic over a context type `Ctx` passed to `execute()`, so
/// tools can reach shared state such as a database handle without closure
/// capture. The default context type is `()`.
///
/// The trait is object-safe (uses boxed futures) so handlers can be stored
/// as `Arc<dyn ToolHandler<Ctx>>`. Arguments arrive already coerced to the
/// types the signature declares.
///
/// # Example with Context
///
/// ```rust
/// use llm_director::tool::{ToolArgs, ToolError, ToolFuture, ToolHandler, ToolOutput};
/// use llm_director_core::{ParamType, ToolSignature};
///
/// struct Greeter {
///     greeting: String,
/// }
///
/// struct Greet;
///
/// impl ToolHandler<Greeter> for Greet {
///     fn signature(&self) -> ToolSignature {
///         ToolSignature::new("greet", "Greet someone").param("name", ParamType::String)
///     }
///
///     fn execute<'a>(&'a self, args: ToolArgs, ctx: &'a Greeter) -> ToolFuture<'a> {
///         Box::pin(async move {
///             let name = args.str(0)?;
///             Ok::<_, ToolError>(ToolOutput::new(format!("{}, {name}!", ctx.greeting)))
///         })
///     }
/// }
/// ```
pub trait ToolHandler<Ctx = ()>: Send + Sync {
    /// Returns the tool's declared signature.
    fn signature(&self) -> ToolSignature;

    /// Runs the tool with coerced arguments and the caller's context.
    fn execute<'a>(&'a self, args: ToolArgs, ctx: &'a Ctx) -> ToolFuture<'a>;
}

/// A tool handler backed by an async closure that receives context.
///
/// Created via [`super::tool_fn_with_ctx`].
pub struct FnToolHandler<Ctx, F> {
    pub(crate) signature: ToolSignature,
    pub(crate) handler: F,
    pub(crate) _ctx: PhantomData<fn(&Ctx)>,
}

impl<Ctx, F> std::fmt::Debug for FnToolHandler<Ctx, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnToolHandler")
            .field("name", &self.signature.name)
            .finish_non_exhaustive()
    }
}

impl<Ctx, F, Fut, O> ToolHandler<Ctx> for FnToolHandler<Ctx, F>
where
    Ctx: Send + Sync + 'static,
    F: for<'c> Fn(ToolArgs, &'c Ctx) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    fn signature(&self) -> ToolSignature {
        self.signature.clone()
    }

    fn execute<'a>(&'a self, args: ToolArgs, ctx: &'a Ctx) -> ToolFuture<'a> {
        let fut = (self.handler)(args, ctx);
        Box::pin(async move { fut.await.map(Into::into) })
    }
}

/// A tool handler that ignores context, created by [`super::tool_fn`].
///
/// Usable in a registry with any context type.
pub struct NoCtxToolHandler<F> {
    pub(crate) signature: ToolSignature,
    pub(crate) handler: F,
}

impl<F> std::fmt::Debug for NoCtxToolHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoCtxToolHandler")
            .field("name", &self.signature.name)
            .finish_non_exhaustive()
    }
}

impl<Ctx, F, Fut, O> ToolHandler<Ctx> for NoCtxToolHandler<F>
where
    Ctx: Send + Sync + 'static,
    F: Fn(ToolArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    fn signature(&self) -> ToolSignature {
        self.signature.clone()
    }

    fn execute<'a>(&'a self, args: ToolArgs, _ctx: &'a Ctx) -> ToolFuture<'a> {
        let fut = (self.handler)(args);
        Box::pin(async move { fut.await.map(Into::into) })
    }
}

/// A synchronous tool body run on the blocking thread pool.
///
/// Created via [`super::tool_fn_blocking`]. Use it for CPU-heavy or
/// blocking-I/O functions so they do not stall the async executor.
pub struct BlockingToolHandler<F> {
    pub(crate) signature: ToolSignature,
    pub(crate) handler: Arc<F>,
}

impl<F> std::fmt::Debug for BlockingToolHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingToolHandler")
            .field("name", &self.signature.name)
            .finish_non_exhaustive()
    }
}

impl<Ctx, F, O> ToolHandler<Ctx> for BlockingToolHandler<F>
where
    Ctx: Send + Sync + 'static,
    F: Fn(ToolArgs) -> Result<O, ToolError> + Send + Sync + 'static,
    O: Into<ToolOutput> + Send + 'static,
{
    fn signature(&self) -> ToolSignature {
        self.signature.clone()
    }

    fn execute<'a>(&'a self, args: ToolArgs, _ctx: &'a Ctx) -> ToolFuture<'a> {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || handler(args).map(Into::into))
                .await
                .map_err(|e| ToolError::new(format!("tool task failed: {e}")))?
        })
    }
}
