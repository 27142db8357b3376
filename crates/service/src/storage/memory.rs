use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::errors::ServiceError;

/// In-memory collection for tests and doc examples. Nothing is persisted.
pub struct MemoryStore<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self { inner: RwLock::new(Vec::new()) }
    }
}

#[async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, records: Vec<T>) -> Result<(), ServiceError> {
        *self.inner.write().await = records;
        Ok(())
    }

    async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        R: Send,
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError> + Send,
    {
        let mut guard = self.inner.write().await;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }
}
