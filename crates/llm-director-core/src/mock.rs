//! Mock provider for testing.
//!
//! [`MockProvider`] is a queue-based fake that lets tests script exactly
//! which responses and errors a provider returns, without any network.
//! It implements [`Provider`], so it also works behind
//! [`DynProvider`](crate::DynProvider) via the blanket impl.
//!
//! ```rust,no_run
//! use llm_director_core::mock::MockProvider;
//! use llm_director_core::{ChatMessage, Provider, Response};
//!
//! # async fn example() {
//! let mock = MockProvider::new();
//! mock.queue_response(Response::text("Hello!"));
//!
//! let resp = mock.send(&[ChatMessage::user("hi")], &[]).await.unwrap();
//! assert_eq!(resp.text, "Hello!");
//! assert_eq!(mock.recorded_calls().len(), 1);
//! # }
//! ```
//!
//! # Why `MockError` instead of `DirectorError`?
//!
//! [`DirectorError`] holds a `Box<dyn Error>` and is not `Clone`, so it
//! cannot sit in a queue. [`MockError`] mirrors the variants a provider
//! would return and converts at dequeue time.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::chat::{ChatMessage, FunctionCall, Response};
use crate::error::DirectorError;
use crate::provider::{Provider, ProviderMetadata};
use crate::signature::ToolSignature;

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSend {
    /// The history passed in.
    pub history: Vec<ChatMessage>,
    /// The tool list passed in.
    pub tools: Vec<ToolSignature>,
}

/// A queue-based mock provider.
///
/// Each `send` pops the front of the queue and records its arguments.
/// Tool-result notifications are recorded too.
///
/// # Panics
///
/// `send` panics if the queue is empty.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<Response, MockError>>>,
    meta: ProviderMetadata,
    calls: Arc<Mutex<Vec<RecordedSend>>>,
    tool_results: Arc<Mutex<Vec<(FunctionCall, String)>>>,
}

/// Cloneable error subset for mock queuing.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Maps to [`DirectorError::Provider`].
    Provider {
        /// Error message.
        message: String,
        /// Whether the error is retryable.
        retryable: bool,
    },
    /// Maps to [`DirectorError::Timeout`].
    Timeout {
        /// Elapsed milliseconds.
        elapsed_ms: u64,
    },
    /// Maps to [`DirectorError::ResponseFormat`].
    ResponseFormat {
        /// What went wrong.
        message: String,
        /// The raw payload.
        raw: String,
    },
}

impl MockError {
    fn into_director_error(self) -> DirectorError {
        match self {
            Self::Provider { message, retryable } => DirectorError::Provider { message, retryable },
            Self::Timeout { elapsed_ms } => DirectorError::Timeout { elapsed_ms },
            Self::ResponseFormat { message, raw } => DirectorError::ResponseFormat { message, raw },
        }
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queued = self.responses.lock().unwrap().len();
        let call_count = self.calls.lock().unwrap().len();
        f.debug_struct("MockProvider")
            .field("meta", &self.meta)
            .field("queued_responses", &queued)
            .field("recorded_calls", &call_count)
            .finish()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_metadata(ProviderMetadata {
            name: "mock".into(),
            model: "mock-model".into(),
        })
    }
}

impl MockProvider {
    /// Creates a mock with default metadata and an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock with the given metadata and an empty queue.
    pub fn with_metadata(meta: ProviderMetadata) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            meta,
            calls: Arc::new(Mutex::new(Vec::new())),
            tool_results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Enqueues a successful response for the next `send`.
    pub fn queue_response(&self, response: Response) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Enqueues an error for the next `send`.
    pub fn queue_error(&self, error: MockError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Every `send` so far, in call order.
    pub fn recorded_calls(&self) -> Vec<RecordedSend> {
        self.calls.lock().unwrap().clone()
    }

    /// Every tool-result notification so far, in order.
    pub fn recorded_tool_results(&self) -> Vec<(FunctionCall, String)> {
        self.tool_results.lock().unwrap().clone()
    }
}

impl Provider for MockProvider {
    async fn send(
        &self,
        history: &[ChatMessage],
        tools: &[ToolSignature],
    ) -> Result<Response, DirectorError> {
        self.calls.lock().unwrap().push(RecordedSend {
            history: history.to_vec(),
            tools: tools.to_vec(),
        });
        let result = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockProvider: no queued responses remaining");
        result.map_err(MockError::into_director_error)
    }

    fn on_tool_result(&self, call: &FunctionCall, result: &str) {
        self.tool_results
            .lock()
            .unwrap()
            .push((call.clone(), result.to_string()));
    }

    fn metadata(&self) -> ProviderMetadata {
        self.meta.clone()
    }
}
