use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub available: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("item {0} not found")]
    NotFound(String),
    /// The catalog answered, but not with a usable item.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// The catalog could not be reached at all.
    #[error("catalog transport failure: {0}")]
    Transport(String),
}
