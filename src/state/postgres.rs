//! Postgres-backed student record store

use super::codec::{self, AttributeMap};
use super::StudentStore;
use crate::error::HelpdeskError;
use crate::models::{student_id, StudentRecord};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub struct PostgresStudentStore {
    pool: PgPool,
    schema_ready: Arc<OnceCell<()>>,
}

impl PostgresStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema_ready: Arc::new(OnceCell::new()),
        }
    }

    /// Lazily connecting pool; nothing touches the server until first use.
    pub fn connect_lazy(url: &str) -> crate::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(url)?;
        Ok(Self::new(pool))
    }

    async fn ensure_schema(&self) -> crate::Result<()> {
        let pool = &self.pool;

        self.schema_ready
            .get_or_try_init(|| async move {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS student_profiles (
                      student_id TEXT PRIMARY KEY,
                      attributes TEXT NOT NULL,
                      updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    );
                    "#,
                )
                .execute(pool)
                .await?;

                Ok::<(), sqlx::Error>(())
            })
            .await
            .map_err(|e| {
                HelpdeskError::Database(format!(
                    "Failed to initialize student profile schema: {}",
                    e
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn upsert(&self, record: &StudentRecord) -> crate::Result<()> {
        let id = super::checked_id(record)?;
        self.ensure_schema().await?;

        let attrs = codec::encode(record);
        let payload = serde_json::to_string(&attrs)?;

        sqlx::query(
            r#"
            INSERT INTO student_profiles (student_id, attributes, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (student_id)
            DO UPDATE SET attributes = EXCLUDED.attributes, updated_at = NOW()
            "#,
        )
        .bind(&id)
        .bind(&payload)
        .execute(&self.pool)
        .await
        .map_err(|e| HelpdeskError::Database(format!("Failed to save student profile: {}", e)))?;

        info!(
            student_id = %id,
            fields = ?attrs.keys().collect::<Vec<_>>(),
            "Saved student profile"
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> crate::Result<Option<StudentRecord>> {
        self.ensure_schema().await?;

        let row = sqlx::query("SELECT attributes FROM student_profiles WHERE student_id = $1")
            .bind(student_id(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HelpdeskError::Database(format!("Failed to load student profile: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.try_get("attributes")?;
        let attrs: AttributeMap = serde_json::from_str(&payload)?;
        Ok(Some(codec::decode(&attrs)))
    }

    async fn delete(&self, name: &str) -> crate::Result<bool> {
        self.ensure_schema().await?;

        let id = student_id(name);
        let result = sqlx::query("DELETE FROM student_profiles WHERE student_id = $1")
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                HelpdeskError::Database(format!("Failed to delete student profile: {}", e))
            })?;

        let deleted = result.rows_affected() > 0;
        info!(student_id = %id, deleted, "Deleted student profile");
        Ok(deleted)
    }
}
