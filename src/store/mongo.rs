//! MongoStore - DocumentStore backed by a MongoDB database.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::stream::TryStreamExt;
use mongodb::{Client, Collection, Database};
use serde_json::Value;

use super::{DocumentStore, StoreError, UpdateOutcome};
use crate::document::{Condition, DocumentId, Fields, Filter, Stored, ID_FIELD};

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Document store over a single MongoDB database.
///
/// The driver client pools connections internally and is safe to share
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    pub fn new(client: Client, database: Database) -> Self {
        Self { client, database }
    }

    /// Connect to `uri` and use the database named `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        tracing::debug!(database = database.name(), "connected to mongodb");
        Ok(Self { client, database })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn id_filter(id: &DocumentId) -> Document {
    doc! { "_id": id.as_object_id() }
}

fn to_document(fields: &Fields) -> Result<Document, StoreError> {
    Ok(bson::to_document(fields)?)
}

fn to_bson(value: &Value) -> Result<Bson, StoreError> {
    Ok(bson::to_bson(value)?)
}

fn from_document(mut document: Document) -> Result<Stored<Fields>, StoreError> {
    let id = match document.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => DocumentId::from(oid),
        Some(other) => {
            return Err(StoreError::InvalidDocument(format!(
                "identifier is not an object id: {other}"
            )))
        }
        None => return Err(StoreError::InvalidDocument("missing identifier".into())),
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(Stored::new(id, fields)),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a document, got {other}"
        ))),
    }
}

fn filter_document(filter: &Filter) -> Result<Document, StoreError> {
    let mut query = Document::new();
    for (field, condition) in filter.clauses() {
        match condition {
            Condition::Eq(value) => {
                query.insert(field.as_str(), to_bson(value)?);
            }
            Condition::Range { gte, lte } => {
                let mut range = Document::new();
                if let Some(low) = gte {
                    range.insert("$gte", to_bson(low)?);
                }
                if let Some(high) = lte {
                    range.insert("$lte", to_bson(high)?);
                }
                query.insert(field.as_str(), range);
            }
        }
    }
    Ok(query)
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        Ok(self.collection(collection).count_documents(doc! {}).await?)
    }

    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();
        let mut document = to_document(&fields)?;
        document.insert(ID_FIELD, id.as_object_id());

        self.collection(collection).insert_one(document).await?;
        tracing::debug!(collection, %id, "inserted document");
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Fields>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(documents.len());
        let mut batch = Vec::with_capacity(documents.len());
        for fields in &documents {
            let id = DocumentId::new();
            let mut document = to_document(fields)?;
            document.insert(ID_FIELD, id.as_object_id());
            ids.push(id);
            batch.push(document);
        }

        self.collection(collection).insert_many(batch).await?;
        tracing::debug!(collection, count = ids.len(), "inserted documents");
        Ok(ids)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Stored<Fields>>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(filter_document(filter)?)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(from_document).collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Stored<Fields>>, StoreError> {
        self.collection(collection)
            .find_one(filter_document(filter)?)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Stored<Fields>>, StoreError> {
        self.collection(collection)
            .find_one(id_filter(id))
            .await?
            .map(from_document)
            .transpose()
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        set: Fields,
    ) -> Result<UpdateOutcome, StoreError> {
        // `$set` with no fields is rejected by the server.
        if set.is_empty() {
            let matched = self
                .collection(collection)
                .count_documents(id_filter(id))
                .await?;
            return Ok(UpdateOutcome {
                matched,
                modified: 0,
            });
        }

        let set = to_document(&set)?;
        let update = doc! { "$set": set };
        let result = self
            .collection(collection)
            .update_one(id_filter(id), update)
            .await?;
        tracing::debug!(
            collection,
            %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "updated document"
        );
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        let result = self.collection(collection).delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
