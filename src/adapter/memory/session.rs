use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::application::app_error::AppResult;
use crate::application::interface::db::DBSession;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;

#[derive(Debug, Default, Clone)]
pub struct MemoryData {
    pub users: HashMap<Uuid, User>,
    /// Keyed by user id: a user holds at most one reset token.
    pub reset_tokens: HashMap<Uuid, PasswordResetToken>,
}

/// Process-local store, used by the `memory` database provider and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> MemoryData {
        self.data.lock().await.clone()
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryData>,
    staged: MemoryData,
}

/// Unit of work over a [`MemoryStore`]. The first gateway call takes the store
/// lock and works on a staged copy; `commit` publishes it, `rollback` or drop
/// discards it. Sessions are therefore fully serialized.
#[derive(Clone)]
pub struct MemorySession {
    store: MemoryStore,
    inner: Arc<Mutex<Option<MemoryTx>>>,
}

impl MemorySession {
    pub fn new_lazy(store: MemoryStore) -> Self {
        Self {
            store,
            inner: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn with_tx<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut MemoryData) -> AppResult<T>,
    {
        let mut inner = self.inner.lock().await;
        let tx = match inner.take() {
            Some(tx) => tx,
            None => {
                let guard = self.store.data.clone().lock_owned().await;
                let staged = (*guard).clone();
                MemoryTx { guard, staged }
            }
        };
        f(&mut inner.insert(tx).staged)
    }
}

#[async_trait]
impl DBSession for MemorySession {
    async fn commit(&self) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(MemoryTx { mut guard, staged }) = inner.take() {
            *guard = staged;
        }
        Ok(())
    }

    async fn rollback(&self) -> AppResult<()> {
        self.inner.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::adapter::memory::session::{MemorySession, MemoryStore};
    use crate::application::interface::db::DBSession;
    use crate::domain::entities::user::User;
    use crate::domain::values::email::EmailAddress;

    fn sample_user() -> User {
        User::new(
            "tester".to_string(),
            EmailAddress::parse("tester@example.com").unwrap(),
            "hashed".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_commit_publishes_staged_changes() {
        let store = MemoryStore::new();
        let session = MemorySession::new_lazy(store.clone());
        let user = sample_user();
        let user_id = user.id.value;

        session
            .with_tx(|data| {
                data.users.insert(user_id, user);
                Ok(())
            })
            .await
            .unwrap();
        session.commit().await.unwrap();

        assert!(store.snapshot().await.users.contains_key(&user_id));
    }

    #[tokio::test]
    async fn test_rollback_and_drop_discard_changes() {
        let store = MemoryStore::new();

        let session = MemorySession::new_lazy(store.clone());
        let user = sample_user();
        session
            .with_tx(|data| {
                data.users.insert(user.id.value, user);
                Ok(())
            })
            .await
            .unwrap();
        session.rollback().await.unwrap();

        {
            let dropped = MemorySession::new_lazy(store.clone());
            let user = sample_user();
            dropped
                .with_tx(|data| {
                    data.users.insert(user.id.value, user);
                    Ok(())
                })
                .await
                .unwrap();
        }

        assert!(store.snapshot().await.users.is_empty());
    }
}
