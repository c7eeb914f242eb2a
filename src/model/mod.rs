//! Models - the three record collections and their typed payloads.
//!
//! A [`Model`] names a collection and the user-facing messages that go with
//! it. Storage stays schema-free (documents are [`Fields`](crate::Fields));
//! typed payloads such as [`NewProduct`] and [`InvoiceCreate`] exist only on
//! the way in, where validation happens.
//!
//! ## Example
//!
//! ```ignore
//! use client_ledger::{InMemoryStore, Product, RecordsExt};
//!
//! let store = InMemoryStore::new();
//! let products = store.records::<Product>().list().await?;
//! ```

mod client;
mod invoice;
mod product;
mod records;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use client::Client;
pub use invoice::{Invoice, InvoiceCreate, InvoiceUpdate, LineItem};
pub use product::{NewProduct, Product, ProductValidationError};
pub use records::{Records, RecordsExt};

/// A document collection managed by the service.
pub trait Model: Send + Sync + 'static {
    /// Collection name in the document store.
    const COLLECTION: &'static str;

    /// Message reported when a record cannot be found.
    const NOT_FOUND: &'static str;

    /// Message reported after a record is deleted.
    const DELETED: &'static str;
}

/// Business identifier of a product (the `product_id` field).
///
/// Unrelated to the product document's [`DocumentId`](crate::DocumentId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Business identifier of a client, as referenced by invoices (`client_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
