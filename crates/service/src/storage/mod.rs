//! Storage abstractions for service layer
//!
//! A record store holds one collection (users or posts) as an ordered
//! sequence. Services are generic over the trait so tests can swap the
//! file-backed store for the in-memory one.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod json_collection_store;
pub mod memory;

pub use json_collection_store::JsonCollectionStore;
pub use memory::MemoryStore;

/// Load/save contract for a single collection of records.
#[async_trait]
pub trait RecordStore<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Snapshot of every record in insertion order.
    async fn load(&self) -> Result<Vec<T>, ServiceError>;

    /// Replace the whole collection.
    async fn save(&self, records: Vec<T>) -> Result<(), ServiceError>;

    /// Read-modify-write under the store's write lock. Changes made by `f`
    /// are kept only if it returns `Ok`.
    async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        R: Send,
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError> + Send;
}
