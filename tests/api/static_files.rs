use serde_json::Value;

use crate::support::{start_server, start_server_with_shipped_assets, INDEX_HTML};

#[tokio::test]
async fn index_page_is_served_at_root() {
    let server = start_server().await;

    let resp = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(resp.text().await.unwrap(), INDEX_HTML);
}

#[tokio::test]
async fn assets_are_served_under_static() {
    let server = start_server().await;

    let resp = server
        .client
        .get(server.url("/static/script.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "console.log('ok');");

    let resp = server
        .client
        .get(server.url("/static/missing.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn health_check() {
    let server = start_server().await;

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn shipped_front_end_is_served() {
    let server = start_server_with_shipped_assets().await;

    let page = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(page.status(), 200);
    let page = page.text().await.unwrap();
    assert!(page.contains(r#"<script src="/static/script.js"></script>"#));
    for id in [
        "searchForm",
        "invoicesList",
        "selectedInvoice",
        "clientsList",
        "productsListContainer",
        "newInvoiceForm",
        "newClientForm",
        "newProductForm",
    ] {
        assert!(page.contains(&format!(r#"id="{id}""#)), "index.html lacks #{id}");
    }

    let script = server
        .client
        .get(server.url("/static/script.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(script.status(), 200);
    let content_type = script.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("javascript"));
    let script = script.text().await.unwrap();
    assert!(script.contains("/api/invoices/search?"));
}
