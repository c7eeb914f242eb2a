//! DocumentStore - abstract access to named collections of documents.
//!
//! The store is constructed once at startup and handed to everything that
//! needs it; there is no process-wide handle. Two implementations ship:
//!
//! - [`MongoStore`] (feature `mongo`) talks to a MongoDB deployment.
//! - [`InMemoryStore`] keeps everything in a lock-guarded map, for tests and
//!   local runs without a database.
//!
//! Every operation is a single call against one collection. Nothing here is
//! transactional: a write followed by a read may observe a concurrent change.

mod in_memory;
#[cfg(feature = "mongo")]
mod mongo;

use async_trait::async_trait;

use crate::document::{DocumentId, Fields, Filter, Stored};

pub use in_memory::InMemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The database driver reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),
    /// A document could not be converted to or from the store's format.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// A stored document is missing its identifier or is not a document.
    #[error("invalid stored document: {0}")]
    InvalidDocument(String),
    /// An in-process lock was poisoned by a panicking writer.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Counts reported by a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents whose identifier matched (0 or 1).
    pub matched: u64,
    /// Documents whose contents actually changed (0 or 1).
    pub modified: u64,
}

impl UpdateOutcome {
    pub fn is_matched(&self) -> bool {
        self.matched > 0
    }
}

/// Abstract document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Number of documents in a collection.
    async fn count(&self, collection: &str) -> Result<u64, StoreError>;

    /// Insert one document and return the identifier assigned to it.
    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Insert a batch of documents in order. An empty batch is a no-op.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// All documents matching the filter, in the store's natural order.
    async fn find(&self, collection: &str, filter: &Filter)
        -> Result<Vec<Stored<Fields>>, StoreError>;

    /// The first document matching the filter.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Stored<Fields>>, StoreError>;

    /// Look up a document by identifier.
    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Stored<Fields>>, StoreError>;

    /// Merge `set` into the document field by field (`$set` semantics).
    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        set: Fields,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Delete a document by identifier. Returns true if it existed.
    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError>;
}
