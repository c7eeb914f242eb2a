//! # client_ledger
//!
//! Record-management backend for three document collections (clients,
//! products, invoices):
//! - an injected [`DocumentStore`] (MongoDB or in-memory)
//! - a one-shot [`seed`] import from CSV files on first start
//! - collection [`handlers`] translating each request into one store call
//! - an axum [`http`] transport with permissive CORS and static hosting

pub mod config;
pub mod document;
pub mod handlers;
pub mod model;
pub mod seed;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use config::Config;
pub use document::{DocumentId, Fields, Filter, Stored};
pub use handlers::HandlerError;
pub use model::{
    Client, ClientId, Invoice, InvoiceCreate, InvoiceUpdate, LineItem, Model, NewProduct,
    Product, ProductId, Records, RecordsExt,
};
pub use seed::{SeedError, SeedPaths, SeedReport};
pub use store::{DocumentStore, InMemoryStore, StoreError, UpdateOutcome};

#[cfg(feature = "mongo")]
pub use store::MongoStore;

/// Crate version, reported at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
