//! Documents - wire-level shapes shared by the store, handlers and seed loader.
//!
//! A document is a map from field name to a JSON value. The store assigns each
//! document a [`DocumentId`] at insert time; that identifier travels next to the
//! fields (see [`Stored`]) and is never stored as one of them.
//!
//! ## Example
//!
//! ```ignore
//! use client_ledger::{DocumentId, Fields, Stored};
//!
//! let mut fields = Fields::new();
//! fields.insert("name".into(), "Acme".into());
//! let stored = Stored::new(DocumentId::new(), fields);
//! // {"_id": "65f0c0ffee...", "name": "Acme"}
//! let json = serde_json::to_value(&stored)?;
//! ```

mod filter;
mod id;

use serde::{Deserialize, Serialize};

pub use filter::{Condition, Filter};
pub use id::{DocumentId, InvalidDocumentId};

/// Field name of the store-assigned identifier on the wire.
pub const ID_FIELD: &str = "_id";

/// A free-form document body: field name to JSON value.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A document together with the identifier the store assigned to it.
///
/// Serializes flat, with the identifier rendered as a hex string under `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Stored<T> {
    pub fn new(id: DocumentId, data: T) -> Self {
        Self { id, data }
    }

    /// Transform the payload, keeping the identifier.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stored<U> {
        Stored {
            id: self.id,
            data: f(self.data),
        }
    }
}

/// Drop any caller-supplied `_id`; identifiers are owned by the store.
pub fn strip_id(mut fields: Fields) -> Fields {
    fields.remove(ID_FIELD);
    fields
}
