//! Turn-by-turn strategy: run the calls the provider requested, feed the
//! results back, repeat until it answers without calls.

use std::fmt::Write as _;

use llm_director_core::{ChatMessage, Conversation, FunctionCall, Response};
use tracing::{debug, warn};

use super::{Action, OrchestrationResult, OrchestrationStrategy, StrategyFuture};
use crate::tool::{CallHistory, CallStatus, InvokeError, ToolRegistry};

/// Appended after a turn whose calls all succeeded.
pub const FINAL_ANSWER_NUDGE: &str =
    "If these results answer the request, state your final answer now without further calls.";

/// Configuration for [`Iterative`].
#[derive(Debug, Clone)]
pub struct IterativeConfig {
    /// Append [`FINAL_ANSWER_NUDGE`] after a turn whose calls all
    /// succeeded. Default: `true`.
    pub nudge_final_answer: bool,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            nudge_final_answer: true,
        }
    }
}

/// Executes requested calls in order, one provider turn at a time.
///
/// Per call:
///
/// - success: a tool message with the result
/// - failure: a corrective message naming the error, then [`Action::Retry`]
/// - repeat of an earlier call: a recall guard plus a restated request
///   carrying every result so far, then [`Action::Intervene`]
///
/// Processing stops at the first failure or repeat. A response with no
/// calls completes the run with the response text as the answer.
#[derive(Debug, Clone, Default)]
pub struct Iterative {
    config: IterativeConfig,
}

impl Iterative {
    /// Creates the strategy with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strategy with the given configuration.
    pub fn with_config(config: IterativeConfig) -> Self {
        Self { config }
    }

    async fn run_turn<Ctx: Send + Sync + 'static>(
        &self,
        registry: &ToolRegistry<Ctx>,
        conversation: &Conversation,
        response: &Response,
        history: &mut CallHistory,
        ctx: &Ctx,
    ) -> OrchestrationResult {
        if response.calls.is_empty() {
            debug!("response has no calls; treating it as the final answer");
            return OrchestrationResult::new(
                Action::Complete,
                vec![ChatMessage::assistant(response.text.clone())],
            );
        }

        let mut messages = vec![ChatMessage::assistant(assistant_content(response))];
        let mut tool_results = Vec::new();

        for call in &response.calls {
            match registry.invoke(call, history, ctx).await {
                CallStatus::Success { key, result } => {
                    messages.push(ChatMessage::tool_result(key, result.clone()));
                    tool_results.push((call.clone(), result));
                }
                CallStatus::Recalled { key, previous } => {
                    warn!(%key, "repeated call; restarting with accumulated results");
                    let messages = vec![
                        recall_guard(&key, &previous),
                        intervention(conversation, history, &key),
                    ];
                    return OrchestrationResult {
                        action: Action::Intervene,
                        messages,
                        tool_results,
                    };
                }
                CallStatus::Error(err) => {
                    warn!(call = %call, error = %err, "call failed; asking for a correction");
                    messages.push(correction(call, &err, registry));
                    return OrchestrationResult {
                        action: Action::Retry,
                        messages,
                        tool_results,
                    };
                }
            }
        }

        if self.config.nudge_final_answer {
            messages.push(ChatMessage::system(FINAL_ANSWER_NUDGE));
        }
        OrchestrationResult {
            action: Action::Continue,
            messages,
            tool_results,
        }
    }
}

impl<Ctx: Send + Sync + 'static> OrchestrationStrategy<Ctx> for Iterative {
    fn name(&self) -> &'static str {
        "iterative"
    }

    fn invoke<'a>(
        &'a self,
        registry: &'a ToolRegistry<Ctx>,
        conversation: &'a Conversation,
        response: &'a Response,
        history: &'a mut CallHistory,
        ctx: &'a Ctx,
    ) -> StrategyFuture<'a> {
        Box::pin(async move {
            Ok(self
                .run_turn(registry, conversation, response, history, ctx)
                .await)
        })
    }
}

/// What the provider said, or the calls it made when it said nothing.
fn assistant_content(response: &Response) -> String {
    if response.text.trim().is_empty() {
        response
            .calls
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        response.text.clone()
    }
}

fn correction<Ctx: Send + Sync + 'static>(
    call: &FunctionCall,
    err: &InvokeError,
    registry: &ToolRegistry<Ctx>,
) -> ChatMessage {
    let mut text = format!("The call `{call}` failed: {err}.");
    if err.is_unresolved() {
        let _ = write!(text, " Available functions: {}.", registry.names().join(", "));
    }
    text.push_str(" Correct the call and try again.");
    ChatMessage::system(text)
}

fn recall_guard(key: &str, previous: &str) -> ChatMessage {
    ChatMessage::system(format!(
        "`{key}` was already called and returned {previous}. \
         Repeating a call does not change its result."
    ))
}

const REQUEST_HEADER: &str = "Original request:\n";
const RESULTS_HEADER: &str = "\n\nResults obtained so far:\n";

fn intervention(conversation: &Conversation, history: &CallHistory, key: &str) -> ChatMessage {
    let request = conversation
        .last_user_message()
        .map_or("(no request found)", |m| original_request(&m.content));
    ChatMessage::user(format!(
        "{REQUEST_HEADER}{request}{RESULTS_HEADER}{}\n\
         Use these results to answer the request. Do not call `{key}` again.",
        history.render()
    ))
}

/// The request a user message carries. After a thread reset the latest user
/// message is an earlier intervention, so its request is unwrapped.
fn original_request(content: &str) -> &str {
    content
        .strip_prefix(REQUEST_HEADER)
        .and_then(|rest| rest.split_once(RESULTS_HEADER))
        .map_or(content, |(request, _)| request)
}
