use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(u16),
}

/// One exchange-rate record as published by the quote endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DollarQuote {
    #[serde(rename = "casa")]
    pub code: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "compra")]
    pub buy: Option<f64>,
    #[serde(rename = "venta")]
    pub sell: Option<f64>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: String,
}

#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<DollarQuote>, QuoteError>;
}

/// Unauthenticated HTTP quote endpoint.
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: reqwest::Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    #[instrument(name = "fetch_quotes", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<DollarQuote>, QuoteError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }
        let quotes: Vec<DollarQuote> = response.json().await?;
        debug!(quote_count = quotes.len(), "Quotes fetched");
        Ok(quotes)
    }
}
