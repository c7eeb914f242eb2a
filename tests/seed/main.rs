use std::fs;
use std::path::Path;

use client_ledger::{
    seed, Client, DocumentStore, InMemoryStore, Invoice, Product, RecordsExt, SeedError,
    SeedPaths, SeedReport,
};
use serde_json::{json, Value};
use tempfile::TempDir;

const CUSTOMERS: &str = "\
client_id,first_name,last_name,email,phone
1,Alice,Martin,alice@example.fr,0601020304
2,Bruno,Durand,,0605060708
3,Chloé,Bernard,chloe@example.fr,0609101112
";

const PRODUCTS: &str = "\
product_id,name,price,stock
1,Stylo,9.99,100
2,Cahier,3.5,
";

const INVOICES: &str = "\
invoice_number,client_id,invoice_date,products,total_amount
F-001,1,2023-01-01,\"[{'product_id': 1, 'quantity': 2, 'price': 9.99}]\",19.98
F-002,3,2023-02-14,\"[{'product_id': 1, 'quantity': 1, 'price': 9.99}, {'product_id': 2, 'quantity': 4, 'price': 3.5}]\",23.99
";

fn seed_dir(customers: &str, products: &str, invoices: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "customer.csv", customers);
    write(dir.path(), "products.csv", products);
    write(dir.path(), "invoices.csv", invoices);
    dir
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn first_run_loads_every_row() {
    let dir = seed_dir(CUSTOMERS, PRODUCTS, INVOICES);
    let store = InMemoryStore::new();

    let report = seed::run(&store, &SeedPaths::in_dir(dir.path())).await.unwrap();
    assert_eq!(
        report,
        SeedReport::Loaded {
            clients: 3,
            products: 2,
            invoices: 2
        }
    );

    assert_eq!(store.records::<Client>().count().await.unwrap(), 3);
    assert_eq!(store.records::<Product>().count().await.unwrap(), 2);
    assert_eq!(store.records::<Invoice>().count().await.unwrap(), 2);
}

#[tokio::test]
async fn cells_keep_their_column_types() {
    let dir = seed_dir(CUSTOMERS, PRODUCTS, INVOICES);
    let store = InMemoryStore::new();
    seed::run(&store, &SeedPaths::in_dir(dir.path())).await.unwrap();

    let clients = store.records::<Client>().list().await.unwrap();
    assert_eq!(clients[0].data["client_id"], json!(1));
    assert_eq!(clients[0].data["phone"], json!(601020304));
    assert_eq!(clients[1].data["email"], Value::Null);
    assert_eq!(clients[2].data["first_name"], json!("Chloé"));

    let products = store.records::<Product>().list().await.unwrap();
    assert_eq!(products[0].data["price"], json!(9.99));
    assert_eq!(products[1].data["stock"], Value::Null);
}

#[tokio::test]
async fn invoice_line_items_become_arrays() {
    let dir = seed_dir(CUSTOMERS, PRODUCTS, INVOICES);
    let store = InMemoryStore::new();
    seed::run(&store, &SeedPaths::in_dir(dir.path())).await.unwrap();

    let invoices = store.records::<Invoice>().list().await.unwrap();
    assert_eq!(
        invoices[0].data["products"],
        json!([{ "product_id": 1, "quantity": 2, "price": 9.99 }])
    );
    assert_eq!(invoices[1].data["products"].as_array().unwrap().len(), 2);
    assert_eq!(invoices[1].data["total_amount"], json!(23.99));
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let dir = seed_dir(CUSTOMERS, PRODUCTS, INVOICES);
    let store = InMemoryStore::new();
    let paths = SeedPaths::in_dir(dir.path());

    seed::run(&store, &paths).await.unwrap();
    let report = seed::run(&store, &paths).await.unwrap();

    assert_eq!(report, SeedReport::Skipped);
    assert_eq!(store.records::<Client>().count().await.unwrap(), 3);
    assert_eq!(store.records::<Invoice>().count().await.unwrap(), 2);
}

#[tokio::test]
async fn existing_clients_skip_without_reading_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryStore::new();
    store
        .records::<Client>()
        .insert(json!({ "client_id": 42 }).as_object().unwrap().clone())
        .await
        .unwrap();

    let report = seed::run(&store, &SeedPaths::in_dir(dir.path())).await.unwrap();
    assert_eq!(report, SeedReport::Skipped);
    assert_eq!(store.count("products").await.unwrap(), 0);
}

#[tokio::test]
async fn missing_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "customer.csv", CUSTOMERS);
    let store = InMemoryStore::new();

    let err = seed::run(&store, &SeedPaths::in_dir(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Io { ref path, .. } if path.ends_with("products.csv")));
    assert_eq!(store.records::<Client>().count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_line_items_abort() {
    let invoices = "\
invoice_number,client_id,invoice_date,products,total_amount
F-001,1,2023-01-01,\"[{'product_id': 1, 'quantity': 2\",19.98
";
    let dir = seed_dir(CUSTOMERS, PRODUCTS, invoices);
    let store = InMemoryStore::new();

    let err = seed::run(&store, &SeedPaths::in_dir(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Literal { row: 1, .. }));
    assert_eq!(store.records::<Client>().count().await.unwrap(), 0);
}

#[tokio::test]
async fn invoices_without_products_column_abort() {
    let invoices = "invoice_number,client_id\nF-001,1\n";
    let dir = seed_dir(CUSTOMERS, PRODUCTS, invoices);
    let store = InMemoryStore::new();

    let err = seed::run(&store, &SeedPaths::in_dir(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SeedError::MissingColumn {
            column: "products",
            ..
        }
    ));
}

#[tokio::test]
async fn id_column_in_seed_file_is_not_stored() {
    let customers = "_id,client_id,name\nabc,1,Alice\n";
    let dir = seed_dir(customers, PRODUCTS, INVOICES);
    let store = InMemoryStore::new();
    seed::run(&store, &SeedPaths::in_dir(dir.path())).await.unwrap();

    let clients = store.records::<Client>().list().await.unwrap();
    assert!(!clients[0].data.contains_key("_id"));
    let rendered = serde_json::to_value(&clients[0]).unwrap();
    assert_eq!(
        rendered,
        json!({ "_id": clients[0].id.to_string(), "client_id": 1, "name": "Alice" })
    );
}
