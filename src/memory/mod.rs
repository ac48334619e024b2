//! Conversation Memory
//!
//! Replaces a process-wide chat history with an injected log sink.

pub mod store;

pub use store::{
    profile_fingerprint, ConversationEntry, ConversationLog, InMemoryConversationLog, MessageRole,
};
