//! client-ledger server binary
//!
//! Connects the document store, runs the seed import, then serves HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use client_ledger::http::{self, AppState};
use client_ledger::{seed, Config, DocumentStore, InMemoryStore, SeedError, SeedReport, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// Record-management backend for clients, products and invoices
#[derive(Parser, Debug)]
#[command(name = "client-ledger-server")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, env = "CLIENT_LEDGER_LISTEN", default_value = "0.0.0.0:8000")]
    listen: String,

    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://mongodb:27017/")]
    mongo_uri: String,

    /// Database name
    #[arg(long, env = "CLIENT_LEDGER_DATABASE", default_value = "gestion_clients")]
    database: String,

    /// Directory holding customer.csv, products.csv and invoices.csv
    #[arg(long, env = "CLIENT_LEDGER_SEED_DIR", default_value = "CSV")]
    seed_dir: PathBuf,

    /// Directory of front-end assets (must contain index.html)
    #[arg(long, env = "CLIENT_LEDGER_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Keep data in memory instead of MongoDB
    #[arg(long, env = "CLIENT_LEDGER_IN_MEMORY")]
    in_memory: bool,
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("seed import failed: {0}")]
    Seed(#[from] SeedError),
    #[error("http server failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,client_ledger=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    let config = Config::builder()
        .listen_addr(args.listen)
        .mongo_uri(args.mongo_uri)
        .database(args.database)
        .seed_dir(args.seed_dir)
        .static_dir(args.static_dir)
        .in_memory(args.in_memory)
        .build();

    tracing::info!("client-ledger v{}", client_ledger::VERSION);
    tracing::info!("Seed directory: {}", config.seed_dir.display());
    tracing::info!("Static directory: {}", config.static_dir.display());

    if let Err(e) = start(&config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

#[cfg(feature = "mongo")]
async fn start(config: &Config) -> Result<(), ServerError> {
    if config.in_memory {
        tracing::warn!("using in-memory store; data will not survive a restart");
        return run(Arc::new(InMemoryStore::new()), config).await;
    }

    tracing::info!("Database: {}", config.database);
    let store = client_ledger::MongoStore::connect(&config.mongo_uri, &config.database).await?;
    run(Arc::new(store), config).await
}

#[cfg(not(feature = "mongo"))]
async fn start(config: &Config) -> Result<(), ServerError> {
    if !config.in_memory {
        tracing::warn!("built without the `mongo` feature; falling back to the in-memory store");
    }
    run(Arc::new(InMemoryStore::new()), config).await
}

async fn run<S: DocumentStore + 'static>(store: Arc<S>, config: &Config) -> Result<(), ServerError> {
    match seed::run(store.as_ref(), &config.seed_paths()).await? {
        SeedReport::Skipped => tracing::info!("Existing data found, seed import skipped"),
        SeedReport::Loaded {
            clients,
            products,
            invoices,
        } => tracing::info!(clients, products, invoices, "Seed data imported"),
    }

    let state = AppState::new(store, config.static_dir.clone());
    http::serve(state, &config.listen_addr).await?;
    Ok(())
}
