//! Orchestration strategies.
//!
//! A strategy turns one provider [`Response`] into an [`OrchestrationResult`]:
//! the messages to append, the calls that succeeded, and what the turn
//! loop should do next. Strategies hold no per-run state, so a single
//! instance can serve many concurrent runs.
//!
//! | Strategy | Calls come from | Finishes with |
//! |----------|-----------------|---------------|
//! | [`Iterative`] | `Response::calls`, one turn at a time | [`Action::Complete`] |
//! | [`TemplateFill`] | `{expr}` spans inside `Response::text` | [`Action::ReplaceAndComplete`] |

mod iterative;
mod template;

use std::future::Future;
use std::pin::Pin;

use llm_director_core::{ChatMessage, ChatRole, Conversation, FunctionCall, Response, ToolSignature};

use crate::tool::{CallHistory, InvokeError, ToolRegistry};

pub use iterative::{FINAL_ANSWER_NUDGE, Iterative, IterativeConfig};
pub use template::{TemplateConfig, TemplateFill, build_advertisement_message};

/// Boxed future returned by [`OrchestrationStrategy::invoke`].
pub type StrategyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<OrchestrationResult, InvokeError>> + Send + 'a>>;

/// What the turn loop should do after a strategy has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// All requested calls succeeded; ask the provider again.
    Continue,
    /// A call failed; a corrective message was emitted. Ask again.
    Retry,
    /// A repeated call was detected. Start a new thread with the emitted
    /// messages and forget the call history.
    Intervene,
    /// The provider gave its final answer.
    Complete,
    /// The response text was rewritten and is the final answer.
    ReplaceAndComplete,
}

impl Action {
    /// Returns true if the run ends after this action.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::ReplaceAndComplete)
    }
}

/// The outcome of one strategy invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationResult {
    /// What to do next.
    pub action: Action,
    /// Messages to append to the conversation, in order.
    pub messages: Vec<ChatMessage>,
    /// Calls that ran successfully this turn with their results, in the
    /// order they ran. The turn loop forwards each to the provider.
    pub tool_results: Vec<(FunctionCall, String)>,
}

impl OrchestrationResult {
    /// A result with no tool results.
    pub fn new(action: Action, messages: Vec<ChatMessage>) -> Self {
        Self {
            action,
            messages,
            tool_results: Vec::new(),
        }
    }

    /// The final answer text for a terminal result: the content of the
    /// last assistant message.
    pub fn final_text(&self) -> Option<&str> {
        if !self.action.is_terminal() {
            return None;
        }
        self.messages
            .iter()
            .rev()
            .find(|m| m.is(ChatRole::Assistant))
            .map(|m| m.content.as_str())
    }
}

/// A policy for turning provider responses into calls and messages.
///
/// The trait is object-safe so a director can hold
/// `Arc<dyn OrchestrationStrategy<Ctx>>`.
pub trait OrchestrationStrategy<Ctx = ()>: Send + Sync
where
    Ctx: Send + Sync + 'static,
{
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Processes one response.
    ///
    /// `conversation` is the state *before* the response; the strategy
    /// only reads it. Successful calls are recorded in `history`.
    /// An `Err` is terminal for the run.
    fn invoke<'a>(
        &'a self,
        registry: &'a ToolRegistry<Ctx>,
        conversation: &'a Conversation,
        response: &'a Response,
        history: &'a mut CallHistory,
        ctx: &'a Ctx,
    ) -> StrategyFuture<'a>;

    /// A system message describing how to call `tools`, if this strategy
    /// needs one. The default needs none.
    fn advertisement(&self, tools: &[ToolSignature]) -> Option<ChatMessage> {
        let _ = tools;
        None
    }
}

/// Runs `strategy` once outside a director.
///
/// Without a `history`, a scratch history is used and discarded, so repeats
/// are only detected within this one response.
pub async fn invoke_strategy<Ctx>(
    strategy: &dyn OrchestrationStrategy<Ctx>,
    registry: &ToolRegistry<Ctx>,
    conversation: &Conversation,
    response: &Response,
    history: Option<&mut CallHistory>,
    ctx: &Ctx,
) -> Result<OrchestrationResult, InvokeError>
where
    Ctx: Send + Sync + 'static,
{
    let mut scratch = CallHistory::new();
    let history = history.unwrap_or(&mut scratch);
    strategy
        .invoke(registry, conversation, response, history, ctx)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_actions() {
        assert!(Action::Complete.is_terminal());
        assert!(Action::ReplaceAndComplete.is_terminal());
        assert!(!Action::Continue.is_terminal());
        assert!(!Action::Retry.is_terminal());
        assert!(!Action::Intervene.is_terminal());
    }

    #[test]
    fn test_final_text_uses_last_assistant_message() {
        let result = OrchestrationResult::new(
            Action::Complete,
            vec![
                ChatMessage::assistant("draft"),
                ChatMessage::system("note"),
                ChatMessage::assistant("final"),
            ],
        );
        assert_eq!(result.final_text(), Some("final"));

        let pending = OrchestrationResult::new(Action::Continue, vec![ChatMessage::assistant("x")]);
        assert_eq!(pending.final_text(), None);
    }
}
