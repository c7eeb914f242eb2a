//! HTTP API integration tests.
//!
//! Starts the axum router on an ephemeral port over an in-memory store and
//! exercises it with reqwest.

#[cfg(feature = "http")]
mod support;

#[cfg(feature = "http")]
mod invoices;
#[cfg(feature = "http")]
mod static_files;
