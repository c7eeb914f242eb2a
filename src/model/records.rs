//! Records - typed accessor for one collection of a DocumentStore.

use std::marker::PhantomData;

use super::Model;
use crate::document::{DocumentId, Fields, Filter, Stored};
use crate::store::{DocumentStore, StoreError, UpdateOutcome};

/// Repository wrapper scoping store calls to the collection of `M`.
pub struct Records<'a, S: ?Sized, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: DocumentStore + ?Sized, M: Model> Records<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.store.count(M::COLLECTION).await
    }

    /// Every record, in the store's natural order.
    pub async fn list(&self) -> Result<Vec<Stored<Fields>>, StoreError> {
        self.store.find(M::COLLECTION, &Filter::new()).await
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<Stored<Fields>>, StoreError> {
        self.store.find(M::COLLECTION, filter).await
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Stored<Fields>>, StoreError> {
        self.store.find_one(M::COLLECTION, filter).await
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Option<Stored<Fields>>, StoreError> {
        self.store.get(M::COLLECTION, id).await
    }

    /// Insert a record and return it with its new identifier.
    pub async fn insert(&self, fields: Fields) -> Result<Stored<Fields>, StoreError> {
        let id = self.store.insert_one(M::COLLECTION, fields.clone()).await?;
        Ok(Stored::new(id, fields))
    }

    pub async fn insert_many(&self, documents: Vec<Fields>) -> Result<Vec<DocumentId>, StoreError> {
        self.store.insert_many(M::COLLECTION, documents).await
    }

    /// Merge fields into an existing record.
    pub async fn update(&self, id: &DocumentId, set: Fields) -> Result<UpdateOutcome, StoreError> {
        self.store.update_one(M::COLLECTION, id, set).await
    }

    /// Delete a record. Returns true if it existed.
    pub async fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        self.store.delete_one(M::COLLECTION, id).await
    }
}

/// Extension trait for typed collection access on any DocumentStore.
pub trait RecordsExt: DocumentStore {
    /// Get a repository scoped to the collection of `M`.
    fn records<M: Model>(&self) -> Records<'_, Self, M> {
        Records::new(self)
    }
}

impl<S: DocumentStore + ?Sized> RecordsExt for S {}
