//! Conversation log storage
//!
//! Every query and every helpdesk answer is appended here, keyed by student id.

use crate::models::{Intent, StudentRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// A single logged message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub entry_id: Uuid,
    pub student_id: String,
    pub role: MessageRole,
    /// Branch that produced the message; `None` for user turns and pre-classification replies.
    pub intent: Option<Intent>,
    pub content: String,
    /// Fingerprint of the profile the message was answered against.
    pub profile_hash: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(
        record: &StudentRecord,
        role: MessageRole,
        intent: Option<Intent>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            student_id: record.student_id(),
            role,
            intent,
            content: content.into(),
            profile_hash: profile_fingerprint(record),
            timestamp: Utc::now(),
        }
    }
}

/// Sink for conversation entries, injected into the router.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn record(&self, entry: ConversationEntry) -> crate::Result<()>;

    /// Entries for one student, oldest first.
    async fn history(&self, student_id: &str) -> crate::Result<Vec<ConversationEntry>>;

    /// Drop a student's entries; returns how many were removed.
    async fn clear(&self, student_id: &str) -> crate::Result<usize>;
}

/// In-memory conversation log
pub struct InMemoryConversationLog {
    entries: Arc<RwLock<HashMap<String, Vec<ConversationEntry>>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn record(&self, entry: ConversationEntry) -> crate::Result<()> {
        let mut entries = self.entries.write().await;
        entries
            .entry(entry.student_id.clone())
            .or_insert_with(Vec::new)
            .push(entry);
        Ok(())
    }

    async fn history(&self, student_id: &str) -> crate::Result<Vec<ConversationEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(student_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, student_id: &str) -> crate::Result<usize> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(student_id).map_or(0, |removed| removed.len()))
    }
}

/// SHA256 of the record's JSON form, hex encoded.
/// Streams the serialization straight into the hasher.
pub fn profile_fingerprint(record: &StudentRecord) -> String {
    let mut hasher = Sha256::new();

    if serde_json::to_writer(&mut HashWriter(&mut hasher), record).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, marks_10th: f64) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            marks_10th: Some(marks_10th),
            ..Default::default()
        }
    }

    #[test]
    fn test_fingerprint_tracks_profile_changes() {
        let a = profile_fingerprint(&record("Dev", 60.0));
        let b = profile_fingerprint(&record("Dev", 60.0));
        let c = profile_fingerprint(&record("Dev", 61.0));

        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_history_is_per_student_and_ordered() {
        let log = InMemoryConversationLog::new();
        let dev = record("Dev Patel", 60.0);
        let ira = record("Ira", 70.0);

        log.record(ConversationEntry::new(&dev, MessageRole::User, None, "Can I get a loan?"))
            .await
            .unwrap();
        log.record(ConversationEntry::new(&ira, MessageRole::User, None, "Hello"))
            .await
            .unwrap();
        log.record(ConversationEntry::new(&dev, MessageRole::Agent, Some(Intent::Loan), "Yes."))
            .await
            .unwrap();

        let history = log.history("dev patel").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[1].intent, Some(Intent::Loan));
        assert!(log.history("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_forgets_one_student() {
        let log = InMemoryConversationLog::new();
        let dev = record("Dev Patel", 60.0);
        let ira = record("Ira", 70.0);

        log.record(ConversationEntry::new(&dev, MessageRole::User, None, "Hi"))
            .await
            .unwrap();
        log.record(ConversationEntry::new(&dev, MessageRole::Agent, Some(Intent::Unknown), "?"))
            .await
            .unwrap();
        log.record(ConversationEntry::new(&ira, MessageRole::User, None, "Hello"))
            .await
            .unwrap();

        assert_eq!(log.clear("dev patel").await.unwrap(), 2);
        assert_eq!(log.clear("dev patel").await.unwrap(), 0);
        assert!(log.history("dev patel").await.unwrap().is_empty());
        assert_eq!(log.history("ira").await.unwrap().len(), 1);
    }
}
