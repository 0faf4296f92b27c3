//! Single-pass strategy: the provider writes its answer with call
//! expressions inline, and each expression is replaced by its result.

use std::fmt::Write as _;

use llm_director_core::expr::{Segment, scan_template};
use llm_director_core::{ChatMessage, Conversation, FunctionCall, Response, ToolSignature, parse_call};
use tracing::{debug, warn};

use super::{Action, OrchestrationResult, OrchestrationStrategy, StrategyFuture};
use crate::tool::{CallHistory, CallStatus, InvokeError, ToolRegistry};

/// Delimiters that mark a call expression inside response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Opening delimiter. Default: `{`.
    pub open: char,
    /// Closing delimiter. Default: `}`.
    pub close: char,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            open: '{',
            close: '}',
        }
    }
}

/// Replaces every delimited call expression in the response text with the
/// call's result and completes the run with the rewritten text.
///
/// Expressions are evaluated left to right; nested calls inside an
/// expression are evaluated innermost first. An expression that repeats an
/// earlier one reuses its recorded result. Text between delimiters that
/// does not parse as a call is left as written. Any other failure ends the
/// run with that error.
#[derive(Debug, Clone, Default)]
pub struct TemplateFill {
    config: TemplateConfig,
}

impl TemplateFill {
    /// Creates the strategy with `{` and `}` as delimiters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with the given delimiters.
    pub fn with_config(config: TemplateConfig) -> Self {
        Self { config }
    }

    async fn fill<Ctx: Send + Sync + 'static>(
        &self,
        registry: &ToolRegistry<Ctx>,
        text: &str,
        history: &mut CallHistory,
        ctx: &Ctx,
    ) -> Result<(String, Vec<(FunctionCall, String)>), InvokeError> {
        let TemplateConfig { open, close } = self.config;
        let mut out = String::with_capacity(text.len());
        let mut results = Vec::new();

        for segment in scan_template(text, open, close) {
            let expr = match segment {
                Segment::Literal(s) => {
                    out.push_str(s);
                    continue;
                }
                Segment::Expr(expr) => expr,
            };

            let call = match parse_call(expr) {
                Ok(call) => call,
                Err(err) => {
                    debug!(%expr, error = %err, "leaving non-call span unchanged");
                    out.push(open);
                    out.push_str(expr);
                    out.push(close);
                    continue;
                }
            };

            match registry.invoke(&call, history, ctx).await {
                CallStatus::Success { result, .. } => {
                    out.push_str(&result);
                    results.push((call, result));
                }
                CallStatus::Recalled { key, previous } => {
                    debug!(%key, "reusing result of identical expression");
                    out.push_str(&previous);
                }
                CallStatus::Error(err) => {
                    warn!(%expr, error = %err, "template expression failed");
                    return Err(err);
                }
            }
        }

        Ok((out, results))
    }
}

impl<Ctx: Send + Sync + 'static> OrchestrationStrategy<Ctx> for TemplateFill {
    fn name(&self) -> &'static str {
        "template"
    }

    fn invoke<'a>(
        &'a self,
        registry: &'a ToolRegistry<Ctx>,
        _conversation: &'a Conversation,
        response: &'a Response,
        history: &'a mut CallHistory,
        ctx: &'a Ctx,
    ) -> StrategyFuture<'a> {
        Box::pin(async move {
            let (text, tool_results) = self.fill(registry, &response.text, history, ctx).await?;
            Ok(OrchestrationResult {
                action: Action::ReplaceAndComplete,
                messages: vec![ChatMessage::assistant(text)],
                tool_results,
            })
        })
    }

    fn advertisement(&self, tools: &[ToolSignature]) -> Option<ChatMessage> {
        advertise(tools, self.config)
    }
}

/// Builds the system message that teaches a provider the inline call
/// syntax with the default `{` `}` delimiters.
///
/// Returns `None` when there are no tools to describe.
pub fn build_advertisement_message(tools: &[ToolSignature]) -> Option<ChatMessage> {
    advertise(tools, TemplateConfig::default())
}

fn advertise(tools: &[ToolSignature], config: TemplateConfig) -> Option<ChatMessage> {
    if tools.is_empty() {
        return None;
    }
    let TemplateConfig { open, close } = config;

    let mut text = format!(
        "You can call the functions below by writing a call expression between \
         {open} and {close} anywhere in your answer. Each expression is replaced by \
         the function's result before your answer is shown.\n\nFunctions:\n"
    );
    for sig in tools {
        let _ = write!(text, "- {sig}");
        if !sig.description.is_empty() {
            let _ = write!(text, ": {}", sig.description);
        }
        text.push('\n');
        for param in &sig.params {
            if let Some(doc) = &param.description {
                let _ = writeln!(text, "    {}: {doc}", param.name);
            }
        }
    }
    let _ = write!(
        text,
        "\nRules:\n\
         - Write calls as name(arg1, arg2), for example {open}name(1, 2){close}.\n\
         - Put text arguments in double quotes and escape inner quotes as \\\".\n\
         - Calls may be nested; inner calls are evaluated first.\n\
         - Write arrays as [1, 2, 3]. A parameter shown as `T...` takes any number of arguments.\n\
         - Only call the functions listed above."
    );
    Some(ChatMessage::system(text))
}
