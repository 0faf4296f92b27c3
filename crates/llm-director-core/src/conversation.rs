//! Conversation state for one dialogue.
//!
//! [`Conversation`] is an append-only, chronologically ordered message log
//! plus an optional system preamble that survives thread resets. Starting a
//! new thread clears the log but keeps the preamble, which is where the
//! tool advertisement and other standing instructions live.
//!
//! # Example
//!
//! ```rust
//! use llm_director_core::{ChatMessage, Conversation};
//!
//! let mut conversation = Conversation::with_system(ChatMessage::system("Be terse."));
//! conversation.append(ChatMessage::user("What is 2 + 3?"));
//! conversation.append(ChatMessage::assistant("5"));
//!
//! assert_eq!(conversation.len(), 3);
//! assert_eq!(conversation.last_user_message().unwrap().content, "What is 2 + 3?");
//!
//! conversation.new_thread();
//! assert_eq!(conversation.len(), 1); // only the system preamble remains
//! ```
//!
//! A conversation has exactly one writer at a time. Independent runs each
//! own their own `Conversation`; nothing here is shared.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatRole};

/// An ordered, resettable message log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Retained across [`new_thread`](Self::new_thread).
    system: Option<ChatMessage>,
    /// The current thread, oldest first.
    messages: Vec<ChatMessage>,
    /// Number of times the thread has been reset.
    threads_started: u32,
}

impl Conversation {
    /// Creates an empty conversation with no system preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty conversation with the given preamble.
    pub fn with_system(system: ChatMessage) -> Self {
        Self {
            system: Some(system),
            ..Self::default()
        }
    }

    /// Replaces the retained system preamble.
    pub fn set_system(&mut self, system: ChatMessage) {
        self.system = Some(system);
    }

    /// The retained system preamble, if any.
    pub fn system(&self) -> Option<&ChatMessage> {
        self.system.as_ref()
    }

    /// Appends a message to the current thread.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Appends every message in order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    /// The full ordered sequence: the preamble first, then the thread.
    pub fn all(&self) -> Vec<ChatMessage> {
        self.iter().cloned().collect()
    }

    /// Iterates the preamble and the thread without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.system.iter().chain(self.messages.iter())
    }

    /// Messages in the current thread only, without the preamble.
    pub fn thread(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Clears the current thread. The preamble is kept.
    pub fn new_thread(&mut self) {
        tracing::debug!(
            discarded = self.messages.len(),
            "starting new conversation thread"
        );
        self.messages.clear();
        self.threads_started += 1;
    }

    /// The most recent [`ChatRole::User`] message in the current thread.
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.is(ChatRole::User))
    }

    /// How many times [`new_thread`](Self::new_thread) has been called.
    pub fn threads_started(&self) -> u32 {
        self.threads_started
    }

    /// Number of messages, counting the preamble.
    pub fn len(&self) -> usize {
        self.messages.len() + usize::from(self.system.is_some())
    }

    /// Returns true if there is neither a preamble nor any message.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
