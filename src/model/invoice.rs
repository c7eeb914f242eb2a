use serde::{Deserialize, Serialize};

use super::{ClientId, Model, ProductId};
use crate::document::Fields;

pub struct Invoice;

impl Model for Invoice {
    const COLLECTION: &'static str = "invoices";
    const NOT_FOUND: &'static str = "Facture non trouvée";
    const DELETED: &'static str = "Facture supprimée avec succès";
}

/// One product line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: f64,
}

/// Body of an invoice creation request. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub invoice_date: String,
    pub client_id: ClientId,
    pub products: Vec<LineItem>,
    pub total_amount: f64,
    pub invoice_number: String,
}

/// Body of an invoice update request.
///
/// Absent and `null` fields are left untouched; `products`, when given,
/// replaces the whole line-item list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

impl InvoiceCreate {
    pub fn into_fields(self) -> Result<Fields, serde_json::Error> {
        to_fields(&self)
    }
}

impl InvoiceUpdate {
    /// The fields to merge: only those that were supplied and non-null.
    pub fn into_fields(self) -> Result<Fields, serde_json::Error> {
        to_fields(&self)
    }
}

fn to_fields<T: Serialize>(value: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(serde::ser::Error::custom("expected a JSON object")),
    }
}
