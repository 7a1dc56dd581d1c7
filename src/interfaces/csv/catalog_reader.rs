use crate::domain::catalog::CatalogItem;
use crate::infrastructure::in_memory::InMemoryCatalog;
use crate::error::{PipelineError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
    price: Decimal,
    status: String,
}

/// Loads a catalog snapshot from CSV with header `id,title,price,status`.
///
/// Only `status == available` makes an item orderable. Any bad row fails the load.
pub fn load_catalog<R: Read>(source: R) -> Result<InMemoryCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut items = Vec::new();
    for row in reader.deserialize::<CatalogRow>() {
        let row = row.map_err(PipelineError::from)?;
        items.push(CatalogItem {
            available: row.status.eq_ignore_ascii_case("available"),
            id: row.id,
            title: row.title,
            price: row.price,
        });
    }
    Ok(InMemoryCatalog::new(items))
}
