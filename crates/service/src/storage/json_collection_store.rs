use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::RecordStore;
use crate::errors::ServiceError;

/// JSON file-backed collection store.
///
/// Persists a `Vec<T>` as a pretty-printed JSON array and keeps a cached copy
/// in memory. Writes go to a sibling temp file which is then renamed over the
/// target, so readers never observe a half-written file.
pub struct JsonCollectionStore<T> {
    inner: RwLock<Vec<T>>,
    file_path: PathBuf,
}

impl<T> JsonCollectionStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Open the collection at `path`. A missing file is created holding `[]`;
    /// an empty file is an empty collection; malformed JSON is an error.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }

        let records: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("corrupt collection {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: Vec<T> = Vec::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("cannot read {}: {e}", file_path.display())));
            }
        };

        debug!(path = %file_path.display(), count = records.len(), "collection_loaded");
        Ok(Arc::new(Self { inner: RwLock::new(records), file_path }))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }
}

async fn write_atomic<T: Serialize>(path: &PathBuf, records: &[T]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(records).map_err(ServiceError::storage)?;
    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::storage)?;
    Ok(())
}

#[async_trait]
impl<T> RecordStore<T> for JsonCollectionStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, records: Vec<T>) -> Result<(), ServiceError> {
        let mut guard = self.inner.write().await;
        write_atomic(&self.file_path, &records).await?;
        *guard = records;
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
        write_atomic(&self.file_path, &draft).await?;
        *guard = draft;
        Ok(out)
    }
}
