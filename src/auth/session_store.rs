use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::SessionRow;

/// Answers whether a login session is still live.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn is_active(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
}

/// Sessions backed by the `sessions` table.
#[derive(Clone)]
pub struct PgSessions {
    db: PgPool,
}

impl PgSessions {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessions {
    async fn is_active(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(SessionRow::find_active(&self.db, session_id, user_id)
            .await?
            .is_some())
    }
}

#[cfg(test)]
pub use memory::MemorySessions;

#[cfg(test)]
mod memory {
    use super::*;
    use std::{collections::HashSet, sync::Mutex};

    /// In-memory sessions for router tests.
    #[derive(Default)]
    pub struct MemorySessions {
        live: Mutex<HashSet<(Uuid, Uuid)>>,
    }

    impl MemorySessions {
        pub fn open(&self, session_id: Uuid, user_id: Uuid) {
            self.live.lock().unwrap().insert((session_id, user_id));
        }

        pub fn close(&self, session_id: Uuid, user_id: Uuid) {
            self.live.lock().unwrap().remove(&(session_id, user_id));
        }
    }

    #[async_trait]
    impl SessionStore for MemorySessions {
        async fn is_active(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
            Ok(self.live.lock().unwrap().contains(&(session_id, user_id)))
        }
    }
}
