use aviabot_core::{AviabotError, AviabotResult};
use async_trait::async_trait;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::{Mutex, RwLock};

/// Durable identity → current-step-label mapping.
///
/// Observability only: the label is a human-readable step name for resume
/// display and support tooling, never consulted for control flow. Control
/// state lives in the [`crate::SessionMap`].
#[async_trait]
pub trait StepStore: Send + Sync {
    /// Register an identity at the start of a flow, replacing any existing
    /// row for it.
    async fn create(&self, identity: &str, display_name: &str, label: &str)
        -> AviabotResult<()>;
    /// Set the current label, inserting the row if it is missing.
    async fn update(&self, identity: &str, label: &str) -> AviabotResult<()>;
    async fn delete(&self, identity: &str) -> AviabotResult<()>;
    async fn get(&self, identity: &str) -> AviabotResult<Option<String>>;
}

/// Map-backed store for tests and single-process runs.
pub struct InMemoryStepStore {
    inner: RwLock<HashMap<String, (String, String)>>,
}

impl InMemoryStepStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStepStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepStore for InMemoryStepStore {
    async fn create(
        &self,
        identity: &str,
        display_name: &str,
        label: &str,
    ) -> AviabotResult<()> {
        self.inner.write().await.insert(
            identity.to_string(),
            (display_name.to_string(), label.to_string()),
        );
        Ok(())
    }

    async fn update(&self, identity: &str, label: &str) -> AviabotResult<()> {
        let mut inner = self.inner.write().await;
        match inner.get_mut(identity) {
            Some(entry) => entry.1 = label.to_string(),
            None => {
                inner.insert(
                    identity.to_string(),
                    (String::new(), label.to_string()),
                );
            }
        }
        Ok(())
    }

    async fn delete(&self, identity: &str) -> AviabotResult<()> {
        self.inner.write().await.remove(identity);
        Ok(())
    }

    async fn get(&self, identity: &str) -> AviabotResult<Option<String>> {
        Ok(self
            .inner
            .read()
            .await
            .get(identity)
            .map(|(_, label)| label.clone()))
    }
}

/// SQLite-backed store, `user_state` table keyed by identity.
pub struct SqliteStepStore {
    conn: Mutex<Connection>,
}

impl SqliteStepStore {
    pub fn open(path: impl AsRef<Path>) -> AviabotResult<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_state (
                identity TEXT PRIMARY KEY,
                display_name TEXT NOT NULL DEFAULT '',
                label TEXT NOT NULL DEFAULT ''
            )",
            [],
        )
        .map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl StepStore for SqliteStepStore {
    async fn create(
        &self,
        identity: &str,
        display_name: &str,
        label: &str,
    ) -> AviabotResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO user_state (identity, display_name, label) VALUES (?1, ?2, ?3)",
            (identity, display_name, label),
        )
        .map_err(storage_err)?;
        Ok(())
    }

    async fn update(&self, identity: &str, label: &str) -> AviabotResult<()> {
        let conn = self.conn.lock().await;
        let updated = conn
            .execute(
                "UPDATE user_state SET label = ?2 WHERE identity = ?1",
                (identity, label),
            )
            .map_err(storage_err)?;
        if updated == 0 {
            conn.execute(
                "INSERT INTO user_state (identity, label) VALUES (?1, ?2)",
                (identity, label),
            )
            .map_err(storage_err)?;
        }
        Ok(())
    }

    async fn delete(&self, identity: &str) -> AviabotResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM user_state WHERE identity = ?1", [identity])
            .map_err(storage_err)?;
        Ok(())
    }

    async fn get(&self, identity: &str) -> AviabotResult<Option<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT label FROM user_state WHERE identity = ?1")
            .map_err(storage_err)?;
        let mut rows = stmt.query([identity]).map_err(storage_err)?;
        match rows.next().map_err(storage_err)? {
            Some(row) => Ok(Some(row.get(0).map_err(storage_err)?)),
            None => Ok(None),
        }
    }
}

fn storage_err(e: rusqlite::Error) -> AviabotError {
    AviabotError::Storage(e.to_string())
}
