//! Seed loader - one-shot import of the initial CSV data.
//!
//! Runs at startup, before the HTTP router accepts traffic. When the
//! `clients` collection is empty, the three seed files are read in full and
//! bulk-inserted into `clients`, `products` and `invoices`. Any failure aborts
//! the whole import; there is no partial-success tracking and no retry. A
//! non-empty `clients` collection makes the loader a no-op.
//!
//! Cells are typed per column: a column whose non-missing cells all parse as
//! integers becomes integers, otherwise as floats, otherwise as booleans
//! (`True`/`true`/`TRUE` and the `False` forms), otherwise everything stays
//! text. Empty cells and the usual missing-value markers (`NA`, `N/A`, `NaN`,
//! `None`, `NULL`, `#N/A`, `<NA>`, ...) become `null`. An `_id` column is
//! dropped; identifiers are assigned by the store. The invoices `products`
//! column is parsed with [`literal::parse`] into a nested array.

pub mod literal;

use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde_json::{Number, Value};

use crate::document::{strip_id, Fields};
use crate::model::{Client, Invoice, Product, RecordsExt};
use crate::store::{DocumentStore, StoreError};

pub use literal::LiteralError;

/// Column of the invoices file holding the line-item literal.
pub const PRODUCTS_COLUMN: &str = "products";

/// Locations of the three seed files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPaths {
    pub clients: PathBuf,
    pub products: PathBuf,
    pub invoices: PathBuf,
}

impl SeedPaths {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            clients: dir.join("customer.csv"),
            products: dir.join("products.csv"),
            invoices: dir.join("invoices.csv"),
        }
    }
}

/// What the loader did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
    /// Clients were already present; nothing was read or written.
    Skipped,
    /// The collections were populated with these document counts.
    Loaded {
        clients: usize,
        products: usize,
        invoices: usize,
    },
}

/// Error type for seed import.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("invoice row {row}: cannot parse products: {source}")]
    Literal {
        row: usize,
        #[source]
        source: LiteralError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Populate the store from the seed files if it has no clients yet.
pub async fn run<S: DocumentStore + ?Sized>(
    store: &S,
    paths: &SeedPaths,
) -> Result<SeedReport, SeedError> {
    let existing = store.records::<Client>().count().await?;
    if existing > 0 {
        tracing::info!(existing, "clients already present, skipping seed import");
        return Ok(SeedReport::Skipped);
    }

    let clients = read_documents(&paths.clients).await?;
    let products = read_documents(&paths.products).await?;
    let invoices = read_invoices(&paths.invoices).await?;

    let report = SeedReport::Loaded {
        clients: clients.len(),
        products: products.len(),
        invoices: invoices.len(),
    };

    store.records::<Client>().insert_many(clients).await?;
    store.records::<Product>().insert_many(products).await?;
    store.records::<Invoice>().insert_many(invoices).await?;

    tracing::info!(?report, "seed import complete");
    Ok(report)
}

/// A CSV file held in memory: header row plus data rows.
struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

async fn read_table(path: &Path) -> Result<Table, SeedError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source| SeedError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader.headers().map_err(csv_error)?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "read seed file");
    Ok(Table { headers, rows })
}

async fn read_documents(path: &Path) -> Result<Vec<Fields>, SeedError> {
    let table = read_table(path).await?;
    Ok(to_documents(&table))
}

async fn read_invoices(path: &Path) -> Result<Vec<Fields>, SeedError> {
    let table = read_table(path).await?;
    let column = table
        .headers
        .iter()
        .position(|h| h == PRODUCTS_COLUMN)
        .ok_or_else(|| SeedError::MissingColumn {
            path: path.to_path_buf(),
            column: PRODUCTS_COLUMN,
        })?;

    let mut documents = to_documents(&table);
    for (index, (document, row)) in documents.iter_mut().zip(&table.rows).enumerate() {
        let raw = row.get(column).unwrap_or_default();
        let products = literal::parse(raw).map_err(|source| SeedError::Literal {
            row: index + 1,
            source,
        })?;
        document.insert(PRODUCTS_COLUMN.to_string(), products);
    }
    Ok(documents)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

fn is_missing(cell: &str) -> bool {
    matches!(
        cell,
        "" | "#N/A"
            | "#N/A N/A"
            | "#NA"
            | "-1.#IND"
            | "-1.#QNAN"
            | "-NaN"
            | "-nan"
            | "1.#IND"
            | "1.#QNAN"
            | "<NA>"
            | "N/A"
            | "NA"
            | "NULL"
            | "NaN"
            | "None"
            | "n/a"
            | "nan"
            | "null"
    )
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_float(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn column_kind<'r>(cells: impl Iterator<Item = &'r str>) -> ColumnKind {
    let present: Vec<&str> = cells.filter(|c| !is_missing(c)).collect();
    if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.iter().all(|c| parse_float(c).is_some()) {
        ColumnKind::Float
    } else if present.iter().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

fn cell_value(cell: &str, kind: ColumnKind) -> Value {
    if is_missing(cell) {
        return Value::Null;
    }
    match kind {
        ColumnKind::Integer => cell
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(cell.to_string())),
        ColumnKind::Float => parse_float(cell)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        ColumnKind::Boolean => parse_bool(cell)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        ColumnKind::Text => Value::String(cell.to_string()),
    }
}

fn to_documents(table: &Table) -> Vec<Fields> {
    let kinds: Vec<ColumnKind> = (0..table.headers.len())
        .map(|column| column_kind(table.rows.iter().map(|row| row.get(column).unwrap_or(""))))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let fields: Fields = table
                .headers
                .iter()
                .zip(&kinds)
                .enumerate()
                .map(|(column, (header, kind))| {
                    let cell = row.get(column).unwrap_or("");
                    (header.to_string(), cell_value(cell, *kind))
                })
                .collect();
            strip_id(fields)
        })
        .collect()
}
