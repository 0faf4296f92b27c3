//! The provider collaborator.
//!
//! A provider wraps one text-generation service. Given the message history
//! and the tool list, it returns a [`Response`] with text and/or requested
//! calls. Transport and per-service request schemas live entirely behind
//! this trait; nothing in this workspace speaks HTTP.
//!
//! As in most async trait pairs, there are two flavours:
//!
//! - **[`Provider`]** uses native async-fn-in-traits and is what backends
//!   implement.
//! - **[`DynProvider`]** is the object-safe mirror with boxed futures. A
//!   blanket `impl<T: Provider> DynProvider for T` bridges the two, so any
//!   provider can be stored as `Arc<dyn DynProvider>`.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, FunctionCall, Response};
use crate::error::DirectorError;
use crate::signature::ToolSignature;

/// The trait every text-generation backend implements.
///
/// `send` is the only long-latency operation in a director run. Calls in
/// the returned [`Response`] must be in the order the service emitted them;
/// backends that decode calls from an unordered map are responsible for
/// restoring that order.
pub trait Provider: Send + Sync {
    /// Sends the conversation so far and returns the next response.
    fn send(
        &self,
        history: &[ChatMessage],
        tools: &[ToolSignature],
    ) -> impl Future<Output = Result<Response, DirectorError>> + Send;

    /// Notification that `call` completed with `result`.
    ///
    /// Called once per successful call, in the order the calls were
    /// requested. The default does nothing.
    fn on_tool_result(&self, call: &FunctionCall, result: &str) {
        let _ = (call, result);
    }

    /// Returns static metadata describing this provider instance.
    fn metadata(&self) -> ProviderMetadata;
}

/// Object-safe counterpart of [`Provider`] for dynamic dispatch.
///
/// You rarely implement this directly; the blanket impl covers every
/// [`Provider`].
pub trait DynProvider: Send + Sync {
    /// Boxed-future version of [`Provider::send`].
    fn send_boxed<'a>(
        &'a self,
        history: &'a [ChatMessage],
        tools: &'a [ToolSignature],
    ) -> Pin<Box<dyn Future<Output = Result<Response, DirectorError>> + Send + 'a>>;

    /// See [`Provider::on_tool_result`].
    fn on_tool_result(&self, call: &FunctionCall, result: &str);

    /// Returns static metadata describing this provider instance.
    fn metadata(&self) -> ProviderMetadata;
}

impl<T: Provider> DynProvider for T {
    fn send_boxed<'a>(
        &'a self,
        history: &'a [ChatMessage],
        tools: &'a [ToolSignature],
    ) -> Pin<Box<dyn Future<Output = Result<Response, DirectorError>> + Send + 'a>> {
        Box::pin(self.send(history, tools))
    }

    fn on_tool_result(&self, call: &FunctionCall, result: &str) {
        Provider::on_tool_result(self, call, result);
    }

    fn metadata(&self) -> ProviderMetadata {
        Provider::metadata(self)
    }
}

/// Describes a provider instance.
///
/// `name` is a [`Cow<'static, str>`] so built-in backends can use string
/// literals while dynamically configured ones use owned strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Human-readable provider name.
    pub name: Cow<'static, str>,
    /// The model identifier.
    pub model: String,
}
