//! The turn loop that drives a provider against a tool registry.
//!
//! Each turn:
//! 1. Sends the full conversation and the tool signatures to the provider
//! 2. Hands the response to the strategy
//! 3. Forwards each successful call result to the provider, in order
//! 4. Applies the strategy's [`Action`]
//!
//! The run ends when the strategy returns a terminal action, when
//! [`DirectorConfig::max_turns`] is used up, or when the optional timeout
//! elapses.

use std::sync::Arc;
use std::time::Duration;

use llm_director_core::{ChatMessage, Conversation, DirectorError, DynProvider};
use tracing::{debug, instrument, warn};

use crate::strategy::{Action, OrchestrationStrategy};
use crate::tool::{CallHistory, ToolRegistry};

/// Configuration for a [`Director`].
///
/// ```rust
/// use std::time::Duration;
/// use llm_director::DirectorConfig;
///
/// let config = DirectorConfig {
///     timeout: Some(Duration::from_secs(30)),
///     ..Default::default()
/// };
/// assert_eq!(config.max_turns, 10);
/// ```
#[derive(Debug, Clone)]
pub struct DirectorConfig {
    /// Maximum number of provider turns per run. Default: 10.
    ///
    /// Every provider error consumes one turn, whether or not it is
    /// retryable; only running out of turns ends the run.
    pub max_turns: u32,
    /// Wall-clock limit for a whole run. Default: none.
    pub timeout: Option<Duration>,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            timeout: None,
        }
    }
}

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct DirectorOutcome {
    /// The final answer text.
    pub answer: String,
    /// Provider turns used, including failed ones.
    pub turns: u32,
    /// Calls completed since the last thread reset.
    pub history: CallHistory,
    /// How many times a repeated call forced a new thread.
    pub interventions: u32,
}

/// Drives one provider, one registry and one strategy.
///
/// A `Director` holds no per-run state. Share it behind an `Arc` and call
/// [`run`](Self::run) from as many tasks as needed; each run owns its
/// conversation and call history.
pub struct Director<Ctx = ()>
where
    Ctx: Send + Sync + 'static,
{
    provider: Arc<dyn DynProvider>,
    registry: Arc<ToolRegistry<Ctx>>,
    strategy: Arc<dyn OrchestrationStrategy<Ctx>>,
    config: DirectorConfig,
}

impl<Ctx> std::fmt::Debug for Director<Ctx>
where
    Ctx: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("provider", &self.provider.metadata().name)
            .field("strategy", &self.strategy.name())
            .field("tools", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<Ctx: Send + Sync + 'static> Director<Ctx> {
    /// Creates a director with default configuration.
    pub fn new(
        provider: Arc<dyn DynProvider>,
        registry: Arc<ToolRegistry<Ctx>>,
        strategy: impl OrchestrationStrategy<Ctx> + 'static,
    ) -> Self {
        Self {
            provider,
            registry,
            strategy: Arc::new(strategy),
            config: DirectorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: DirectorConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<ToolRegistry<Ctx>> {
        &self.registry
    }

    /// Runs `conversation` to a final answer.
    ///
    /// The strategy's advertisement, if any, becomes the conversation's
    /// system preamble. Messages produced along the way are appended to
    /// `conversation`, so the caller can inspect or continue it afterwards.
    ///
    /// A failed provider request is logged and the next turn is tried, even
    /// when [`DirectorError::is_retryable`] is false. The last such error is
    /// reported in [`DirectorError::TurnBudgetExhausted`].
    ///
    /// # Errors
    ///
    /// - [`DirectorError::TurnBudgetExhausted`] when no final answer arrives
    ///   within `max_turns`
    /// - [`DirectorError::Timeout`] when the configured timeout elapses
    /// - [`DirectorError::Invocation`] when the strategy fails terminally
    #[instrument(skip_all, fields(strategy = self.strategy.name(), max_turns = self.config.max_turns))]
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        ctx: &Ctx,
    ) -> Result<DirectorOutcome, DirectorError> {
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.drive(conversation, ctx))
                .await
                .map_err(|_| DirectorError::Timeout {
                    elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => self.drive(conversation, ctx).await,
        }
    }

    /// Runs a single prompt on a fresh conversation.
    pub async fn ask(
        &self,
        prompt: impl Into<String>,
        ctx: &Ctx,
    ) -> Result<DirectorOutcome, DirectorError> {
        let mut conversation = Conversation::new();
        conversation.append(ChatMessage::user(prompt));
        self.run(&mut conversation, ctx).await
    }

    async fn drive(
        &self,
        conversation: &mut Conversation,
        ctx: &Ctx,
    ) -> Result<DirectorOutcome, DirectorError> {
        let tools = self.registry.signatures();
        if let Some(advertisement) = self.strategy.advertisement(&tools) {
            conversation.set_system(advertisement);
        }

        let mut history = CallHistory::new();
        let mut interventions = 0;
        let mut last_error: Option<String> = None;

        for turn in 1..=self.config.max_turns {
            let messages = conversation.all();
            let response = match self.provider.send_boxed(&messages, &tools).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(turn, retryable = err.is_retryable(), error = %err, "provider request failed");
                    last_error = Some(err.to_string());
                    continue;
                }
            };

            let result = self
                .strategy
                .invoke(&self.registry, conversation, &response, &mut history, ctx)
                .await
                .map_err(|e| DirectorError::Invocation(Box::new(e)))?;

            for (call, output) in &result.tool_results {
                self.provider.on_tool_result(call, output);
            }
            debug!(turn, action = ?result.action, calls = result.tool_results.len(), "turn finished");

            match result.action {
                Action::Complete | Action::ReplaceAndComplete => {
                    let answer = result.final_text().unwrap_or_default().to_string();
                    conversation.extend(result.messages);
                    return Ok(DirectorOutcome {
                        answer,
                        turns: turn,
                        history,
                        interventions,
                    });
                }
                Action::Continue => {
                    last_error = None;
                    conversation.extend(result.messages);
                }
                Action::Retry => {
                    last_error = result.messages.last().map(|m| m.content.clone());
                    conversation.extend(result.messages);
                }
                Action::Intervene => {
                    interventions += 1;
                    last_error = Some("repeated an identical call".into());
                    conversation.new_thread();
                    history.clear();
                    conversation.extend(result.messages);
                }
            }
        }

        warn!(turns = self.config.max_turns, "turn budget exhausted");
        Err(DirectorError::TurnBudgetExhausted {
            turns: self.config.max_turns,
            last_error,
        })
    }
}
