//! InMemoryStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{DocumentStore, StoreError, UpdateOutcome};
use crate::document::{DocumentId, Fields, Filter, Stored};

/// In-memory document store.
///
/// Each collection is a vector in insertion order, which is the natural
/// order `find` reports. Clone-friendly via Arc; clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Stored<Fields>>>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("count"))?;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let mut ids = self.insert_many(collection, vec![fields]).await?;
        ids.pop()
            .ok_or_else(|| StoreError::Backend("insert produced no identifier".into()))
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;

        let docs = collections.entry(collection.to_string()).or_default();
        let mut ids = Vec::with_capacity(documents.len());
        for fields in documents {
            let id = DocumentId::new();
            docs.push(Stored::new(id, fields));
            ids.push(id);
        }
        Ok(ids)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Stored<Fields>>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("find"))?;

        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Stored<Fields>>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_one"))?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(&doc.data)))
            .cloned())
    }

    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Stored<Fields>>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == *id))
            .cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        set: Fields,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == *id))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut changed = false;
        for (name, value) in set {
            if doc.data.get(&name) != Some(&value) {
                doc.data.insert(name, value);
                changed = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| doc.id == *id) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
