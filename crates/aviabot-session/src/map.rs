use crate::session::ConversationSession;
use aviabot_core::AviabotResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed store of in-flight sessions, one per identity.
///
/// Injected into the engine rather than held as a global so tests can
/// substitute their own map.
#[async_trait]
pub trait SessionMap: Send + Sync {
    async fn get(&self, identity: &str) -> AviabotResult<Option<ConversationSession>>;
    async fn put(&self, session: ConversationSession) -> AviabotResult<()>;
    /// Remove and return the session for `identity`, if any.
    async fn remove(&self, identity: &str) -> AviabotResult<Option<ConversationSession>>;
}

/// Default map backed by a `HashMap` behind an async `RwLock`.
pub struct InMemorySessionMap {
    inner: RwLock<HashMap<String, ConversationSession>>,
}

impl InMemorySessionMap {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionMap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionMap for InMemorySessionMap {
    async fn get(&self, identity: &str) -> AviabotResult<Option<ConversationSession>> {
        Ok(self.inner.read().await.get(identity).cloned())
    }

    async fn put(&self, session: ConversationSession) -> AviabotResult<()> {
        self.inner
            .write()
            .await
            .insert(session.identity.clone(), session);
        Ok(())
    }

    async fn remove(&self, identity: &str) -> AviabotResult<Option<ConversationSession>> {
        Ok(self.inner.write().await.remove(identity))
    }
}
