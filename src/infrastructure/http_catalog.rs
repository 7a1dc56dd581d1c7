use crate::domain::catalog::{CatalogError, CatalogItem};
use crate::domain::ports::CatalogClient;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const AVAILABLE: &str = "available";

#[derive(Debug, Deserialize)]
struct BookDto {
    id: String,
    title: String,
    price: Decimal,
    status: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: BookDto,
}

/// Catalog client for the book service REST API (`GET {base}/books/{id}`).
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::InternalError(Box::new(e)))?;

        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                PipelineError::ValidationError(format!("Invalid book service url '{base_url}'"))
            })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// `{base}/books/{id}` with the id as one escaped path segment.
    fn book_url(&self, item_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("books").push(item_id);
        }
        url
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_item(&self, item_id: &str) -> std::result::Result<CatalogItem, CatalogError> {
        let url = self.book_url(item_id);
        debug!(%url, "catalog lookup");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(CatalogError::NotFound(item_id.to_string())),
            status => {
                return Err(CatalogError::Unavailable(format!(
                    "book service returned status {}",
                    status.as_u16()
                )));
            }
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("malformed catalog response: {e}")))?;
        let book = envelope.data;

        Ok(CatalogItem {
            id: book.id,
            title: book.title,
            price: book.price,
            available: book.status == AVAILABLE,
        })
    }
}
