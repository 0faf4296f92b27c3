//! Resolution, nested evaluation, coercion and execution of parsed calls.
//!
//! A call is *bound* before it runs: its name is resolved, its arity
//! checked, every nested call among its arguments evaluated innermost
//! first, and each argument coerced to the declared type. The canonical
//! key is computed from the bound values, so loop detection compares what
//! the tool would actually receive rather than how the model spelled it.
//!
//! Nested calls run outside the call history. Only the outermost call of
//! an expression is checked against and recorded in it.

use std::sync::Arc;

use futures::future::BoxFuture;
use llm_director_core::{FunctionCall, ParamType, ParsedArgument};
use serde_json::Value;
use tracing::{debug, instrument};

use super::history::canonical_key;
use super::{CallHistory, InvokeError, ToolArgs, ToolHandler, ToolRegistry};
use crate::coerce::coerce;

/// Maximum depth of nested calls inside one expression.
pub const MAX_NESTING: usize = 16;

/// Outcome of invoking one top-level call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallStatus {
    /// The tool ran and its result was recorded.
    Success {
        /// Canonical call key.
        key: String,
        /// Textual result.
        result: String,
    },
    /// An identical call was already made in this attempt. The tool was
    /// not run again.
    Recalled {
        /// Canonical call key.
        key: String,
        /// The result recorded the first time.
        previous: String,
    },
    /// The call could not be completed.
    Error(InvokeError),
}

impl CallStatus {
    /// Returns true for [`CallStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A call whose arguments have been evaluated and coerced.
struct BoundCall<Ctx> {
    name: String,
    key: String,
    args: Vec<Value>,
    handler: Arc<dyn ToolHandler<Ctx>>,
}

impl<Ctx: Send + Sync + 'static> BoundCall<Ctx> {
    async fn run(self, ctx: &Ctx) -> Result<String, InvokeError> {
        let output = self
            .handler
            .execute(ToolArgs::new(self.args), ctx)
            .await
            .map_err(|source| InvokeError::Tool {
                name: self.name,
                source,
            })?;
        Ok(output.content)
    }
}

impl<Ctx: Send + Sync + 'static> ToolRegistry<Ctx> {
    /// Invokes a top-level call against `history`.
    ///
    /// A call whose canonical key is already in `history` is reported as
    /// [`CallStatus::Recalled`] and not executed. A successful call is
    /// recorded. Failures never touch `history`.
    #[instrument(skip_all, fields(call = %call.name))]
    pub async fn invoke(
        &self,
        call: &FunctionCall,
        history: &mut CallHistory,
        ctx: &Ctx,
    ) -> CallStatus {
        let bound = match self.bind(call, ctx, 0).await {
            Ok(bound) => bound,
            Err(err) => return CallStatus::Error(err),
        };

        if let Some(previous) = history.get(&bound.key) {
            debug!(key = %bound.key, "call already made in this attempt");
            return CallStatus::Recalled {
                previous: previous.to_string(),
                key: bound.key,
            };
        }

        let key = bound.key.clone();
        match bound.run(ctx).await {
            Ok(result) => {
                debug!(%key, "call succeeded");
                history.record(key.clone(), result.clone());
                CallStatus::Success { key, result }
            }
            Err(err) => CallStatus::Error(err),
        }
    }

    /// Evaluates a call without any history, returning its textual result.
    pub async fn evaluate(&self, call: &FunctionCall, ctx: &Ctx) -> Result<String, InvokeError> {
        self.bind(call, ctx, 0).await?.run(ctx).await
    }

    fn bind<'a>(
        &'a self,
        call: &'a FunctionCall,
        ctx: &'a Ctx,
        depth: usize,
    ) -> BoxFuture<'a, Result<BoundCall<Ctx>, InvokeError>> {
        Box::pin(async move {
            if depth >= MAX_NESTING {
                return Err(InvokeError::NestingTooDeep { limit: MAX_NESTING });
            }
            let tool = self
                .tools
                .get(&call.name)
                .ok_or_else(|| InvokeError::Unresolved {
                    name: call.name.clone(),
                })?;
            let sig = &tool.signature;

            if !sig.accepts_arity(call.args.len()) {
                let expected = if sig.has_vararg() {
                    format!("at least {}", sig.required_args())
                } else {
                    sig.params.len().to_string()
                };
                return Err(InvokeError::Arity {
                    name: call.name.clone(),
                    expected,
                    found: call.args.len(),
                });
            }

            let last = sig.params.len().saturating_sub(1);
            let mut values = Vec::with_capacity(sig.params.len());
            for (i, param) in sig.params.iter().enumerate() {
                let value = match &param.ty {
                    ParamType::Vararg(elem) if i == last => {
                        self.bind_vararg(&call.args[i..], elem, &param.name, ctx, depth)
                            .await?
                    }
                    ty => {
                        self.bind_arg(&call.args[i], ty, &param.name, ctx, depth)
                            .await?
                    }
                };
                values.push(value);
            }

            Ok(BoundCall {
                key: canonical_key(&call.name, &values),
                name: call.name.clone(),
                args: values,
                handler: Arc::clone(&tool.handler),
            })
        })
    }

    async fn bind_arg(
        &self,
        raw: &str,
        ty: &ParamType,
        param: &str,
        ctx: &Ctx,
        depth: usize,
    ) -> Result<Value, InvokeError> {
        let resolved = self
            .resolve_nested(ParsedArgument::classify(raw), ty, ctx, depth)
            .await?;
        Ok(coerce(&resolved, ty, param)?)
    }

    /// Binds the arguments that fill a trailing vararg.
    ///
    /// A single argument that is itself a group, or evaluates to one, is
    /// spread across the vararg rather than nested inside it.
    async fn bind_vararg(
        &self,
        rest: &[String],
        elem: &ParamType,
        param: &str,
        ctx: &Ctx,
        depth: usize,
    ) -> Result<Value, InvokeError> {
        if let [single] = rest {
            if !elem.is_list() {
                let list = ParamType::vararg(elem.clone());
                let resolved = self
                    .resolve_nested(ParsedArgument::classify(single), &list, ctx, depth)
                    .await?;
                return if matches!(resolved, ParsedArgument::Varargs(_)) {
                    Ok(coerce(&resolved, &list, param)?)
                } else {
                    Ok(Value::Array(vec![coerce(&resolved, elem, param)?]))
                };
            }
        }

        let mut items = Vec::with_capacity(rest.len());
        for raw in rest {
            items.push(self.bind_arg(raw, elem, param, ctx, depth).await?);
        }
        Ok(Value::Array(items))
    }

    /// Replaces nested calls in `arg` by their results.
    ///
    /// A call to an unregistered name in a list position is read as an
    /// array constructor such as `listOf(1, 2)`: its arguments become the
    /// list elements.
    fn resolve_nested<'a>(
        &'a self,
        arg: ParsedArgument,
        ty: &'a ParamType,
        ctx: &'a Ctx,
        depth: usize,
    ) -> BoxFuture<'a, Result<ParsedArgument, InvokeError>> {
        Box::pin(async move {
            match (arg, ty.element()) {
                (ParsedArgument::Call(call), _) if self.contains(&call.name) => {
                    let result = self.bind(&call, ctx, depth + 1).await?.run(ctx).await?;
                    debug!(call = %call, %result, "nested call evaluated");
                    Ok(ParsedArgument::literal(&result))
                }
                (ParsedArgument::Call(call), Some(elem)) => {
                    let mut items = Vec::with_capacity(call.args.len());
                    for raw in &call.args {
                        let item = ParsedArgument::classify(raw);
                        items.push(self.resolve_nested(item, elem, ctx, depth + 1).await?);
                    }
                    Ok(ParsedArgument::Varargs(items))
                }
                (ParsedArgument::Call(call), None) => Err(InvokeError::Unresolved { name: call.name }),
                (ParsedArgument::Varargs(items), Some(elem)) => {
                    let mut resolved = Vec::with_capacity(items.len());
                    for item in items {
                        resolved.push(self.resolve_nested(item, elem, ctx, depth).await?);
                    }
                    Ok(ParsedArgument::Varargs(resolved))
                }
                (other, _) => Ok(other),
            }
        })
    }
}
