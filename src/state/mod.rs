//! Student record store
//!
//! Profiles are keyed by lowercased name and stored as flat string
//! attribute maps. Writes are a single upsert: a profile is replaced
//! wholesale, never merged and never briefly absent.

pub mod codec;
pub mod postgres;

pub use postgres::PostgresStudentStore;

use crate::error::HelpdeskError;
use crate::models::{student_id, StudentRecord};
use codec::AttributeMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Trait for student profile persistence
#[async_trait::async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert or replace the profile stored under the record's id.
    async fn upsert(&self, record: &StudentRecord) -> crate::Result<()>;
    async fn get(&self, name: &str) -> crate::Result<Option<StudentRecord>>;
    /// Returns whether a profile was removed.
    async fn delete(&self, name: &str) -> crate::Result<bool>;
}

fn checked_id(record: &StudentRecord) -> crate::Result<String> {
    if record.name.is_empty() {
        return Err(HelpdeskError::InvalidProfile(
            "cannot store a profile without a name".to_string(),
        ));
    }
    Ok(record.student_id())
}

/// In-memory store for development and tests.
/// Holds encoded attribute maps so reads go through the same codec as Postgres.
pub struct InMemoryStudentStore {
    profiles: Arc<RwLock<HashMap<String, AttributeMap>>>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStudentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn upsert(&self, record: &StudentRecord) -> crate::Result<()> {
        let id = checked_id(record)?;
        let attrs = codec::encode(record);

        info!(
            student_id = %id,
            fields = ?attrs.keys().collect::<Vec<_>>(),
            "Saved student profile"
        );

        let mut profiles = self.profiles.write().await;
        profiles.insert(id, attrs);
        Ok(())
    }

    async fn get(&self, name: &str) -> crate::Result<Option<StudentRecord>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&student_id(name)).map(codec::decode))
    }

    async fn delete(&self, name: &str) -> crate::Result<bool> {
        let id = student_id(name);
        let removed = self.profiles.write().await.remove(&id).is_some();
        info!(student_id = %id, deleted = removed, "Deleted student profile");
        Ok(removed)
    }
}

/// Postgres when a database URL is configured, otherwise in-memory.
pub fn build_store(database_url: Option<&str>) -> Arc<dyn StudentStore> {
    if let Some(url) = database_url {
        match PostgresStudentStore::connect_lazy(url) {
            Ok(store) => {
                info!("Student record store: postgres");
                return Arc::new(store);
            }
            Err(error) => {
                warn!(
                    "Failed to initialize postgres record store, falling back to in-memory: {}",
                    error
                );
            }
        }
    }

    info!("Student record store: in-memory");
    Arc::new(InMemoryStudentStore::new())
}

/// Postgres only; callers that read profiles written by another process
/// have nothing to find in a fresh in-memory store.
pub fn build_persistent_store(database_url: Option<&str>) -> crate::Result<Arc<dyn StudentStore>> {
    let url = database_url.ok_or_else(|| {
        HelpdeskError::Config(
            "no persistent record store configured; set POSTGRES_URL or DATABASE_URL".to_string(),
        )
    })?;
    Ok(Arc::new(PostgresStudentStore::connect_lazy(url)?))
}
