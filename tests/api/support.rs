//! Test server harness.

use std::path::Path;
use std::sync::Arc;

use client_ledger::http::{self, AppState};
use client_ledger::InMemoryStore;
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!doctype html><title>Gestion</title><div id=\"app\"></div>";

/// A running server; keeps its temporary asset directory alive.
pub struct TestServer {
    pub base: String,
    pub store: InMemoryStore,
    pub client: reqwest::Client,
    _assets: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Bind to port 0 and serve the router over a fresh in-memory store.
pub async fn start_server() -> TestServer {
    start_server_with(InMemoryStore::new()).await
}

pub async fn start_server_with(store: InMemoryStore) -> TestServer {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(assets.path().join("script.js"), "console.log('ok');").unwrap();

    let mut server = serve(store, assets.path()).await;
    server._assets = Some(assets);
    server
}

/// Serve the front-end shipped in the crate's `static/` directory.
pub async fn start_server_with_shipped_assets() -> TestServer {
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    serve(InMemoryStore::new(), &static_dir).await
}

async fn serve(store: InMemoryStore, static_dir: &Path) -> TestServer {
    let state = AppState::new(Arc::new(store.clone()), static_dir);
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        store,
        client: reqwest::Client::new(),
        _assets: None,
    }
}
