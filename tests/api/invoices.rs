use serde_json::{json, Value};

use crate::support::{start_server, TestServer};

fn invoice(number: &str, client_id: i64, date: &str) -> Value {
    json!({
        "invoice_date": date,
        "client_id": client_id,
        "products": [
            { "product_id": 1, "quantity": 2, "price": 9.99 },
            { "product_id": 4, "quantity": 1, "price": 5.0 }
        ],
        "total_amount": 24.98,
        "invoice_number": number
    })
}

async fn create(server: &TestServer, body: &Value) -> Value {
    let resp = server
        .client
        .post(server.url("/api/invoices"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

async fn search(server: &TestServer, query: &str) -> Vec<String> {
    let resp = server
        .client
        .get(server.url(&format!("/api/invoices/search{query}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let found: Vec<Value> = resp.json().await.unwrap();
    found
        .iter()
        .map(|i| i["invoice_number"].as_str().unwrap().to_string())
        .collect()
}

async fn seeded() -> TestServer {
    let server = start_server().await;
    for (number, client_id, date) in [
        ("F-001", 5, "2023-01-01"),
        ("F-002", 5, "2023-02-10"),
        ("F-003", 7, "2023-01-31"),
        ("F-004", 7, "2022-12-31"),
    ] {
        create(&server, &invoice(number, client_id, date)).await;
    }
    server
}

#[tokio::test]
async fn create_and_get() {
    let server = start_server().await;
    let body = invoice("F-100", 3, "2023-05-01");
    let created = create(&server, &body).await;

    let mut expected = body.clone();
    expected["_id"] = created["_id"].clone();
    assert_eq!(created, expected);

    let resp = server
        .client
        .get(server.url(&format!("/api/invoices/{}", created["_id"].as_str().unwrap())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let loaded: Value = resp.json().await.unwrap();
    assert_eq!(loaded, created);
    assert!(loaded["products"].is_array());
}

#[tokio::test]
async fn create_rejects_schema_violations() {
    let server = start_server().await;

    let mut missing_number = invoice("F-1", 1, "2023-01-01");
    missing_number.as_object_mut().unwrap().remove("invoice_number");

    let mut bad_line = invoice("F-1", 1, "2023-01-01");
    bad_line["products"] = json!([{ "product_id": 1, "quantity": "deux", "price": 1.0 }]);

    let mut bad_client = invoice("F-1", 1, "2023-01-01");
    bad_client["client_id"] = json!("cinq");

    for body in [missing_number, bad_line, bad_client] {
        let resp = server
            .client
            .post(server.url("/api/invoices"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422, "accepted {body}");
    }

    let all: Vec<Value> = server
        .client
        .get(server.url("/api/invoices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn search_filters() {
    let server = seeded().await;

    assert_eq!(search(&server, "?client_id=5").await, ["F-001", "F-002"]);
    assert_eq!(
        search(&server, "?date_start=2023-01-01&date_end=2023-01-31").await,
        ["F-001", "F-003"]
    );
    assert_eq!(
        search(&server, "?client_id=7&date_start=2023-01-01&date_end=2023-01-31").await,
        ["F-003"]
    );
    assert_eq!(search(&server, "?date_end=2022-12-31").await, ["F-004"]);
    assert_eq!(search(&server, "").await.len(), 4);
}

#[tokio::test]
async fn search_rejects_non_integer_client_id() {
    let server = seeded().await;
    let resp = server
        .client
        .get(server.url("/api/invoices/search?client_id=abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn partial_update_changes_only_total() {
    let server = start_server().await;
    let created = create(&server, &invoice("F-200", 9, "2023-07-14")).await;
    let url = server.url(&format!("/api/invoices/{}", created["_id"].as_str().unwrap()));

    let resp = server
        .client
        .put(&url)
        .json(&json!({ "total_amount": 30.0, "invoice_date": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();

    let mut expected = created.clone();
    expected["total_amount"] = json!(30.0);
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn update_replaces_products_and_missing_is_404() {
    let server = start_server().await;
    let created = create(&server, &invoice("F-300", 9, "2023-07-14")).await;
    let url = server.url(&format!("/api/invoices/{}", created["_id"].as_str().unwrap()));

    let updated: Value = server
        .client
        .put(&url)
        .json(&json!({ "products": [{ "product_id": 2, "quantity": 3, "price": 1.5 }] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        updated["products"],
        json!([{ "product_id": 2, "quantity": 3, "price": 1.5 }])
    );

    let resp = server
        .client
        .put(server.url("/api/invoices/65f0c0ffee00000000000001"))
        .json(&json!({ "total_amount": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Facture non trouvée");
}

#[tokio::test]
async fn delete_invoice() {
    let server = start_server().await;
    let created = create(&server, &invoice("F-400", 9, "2023-07-14")).await;
    let url = server.url(&format!("/api/invoices/{}", created["_id"].as_str().unwrap()));

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Facture supprimée avec succès");

    assert_eq!(server.client.get(&url).send().await.unwrap().status(), 404);
}

#[tokio::test]
async fn empty_date_parameters_do_not_filter() {
    let server = start_server().await;
    create(&server, &invoice("F-010", 5, "2023-01-01")).await;
    create(&server, &invoice("F-011", 5, "2023-02-01")).await;

    assert_eq!(search(&server, "?date_end=").await, ["F-010", "F-011"]);
    assert_eq!(search(&server, "?date_start=&date_end=").await, ["F-010", "F-011"]);
    assert_eq!(search(&server, "?date_start=2023-01-15&date_end=").await, ["F-011"]);
    assert_eq!(search(&server, "?client_id=5&date_start=").await, ["F-010", "F-011"]);
}
