//! # HTTP Client
//!
//! Typed wrapper over the service's JSON routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiClient method        Route                                          │
//! │  ─────────────────       ─────────────────────────────────────          │
//! │  register                POST   /api/products                           │
//! │  list                    GET    /api/products                           │
//! │  latest                  GET    /api/products/latest   (404 → None)     │
//! │  get_by_barcode          GET    /api/products/barcode/{code}            │
//! │  get_by_id               GET    /api/products/{id}                      │
//! │  update                  PUT    /api/products/{id}                      │
//! │  delete                  DELETE /api/products/{id}                      │
//! │  checkout                POST   /api/transaction                        │
//! │  history                 GET    /api/transactions?limit=N               │
//! │  server_ip               GET    /api/server-ip                          │
//! │  health                  GET    /health                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use grocer_core::{
    Ack, CheckoutItem, CheckoutReceipt, CheckoutRequest, HealthStatus, Product, ProductOverrides,
    ProductUpdate, ServerAddress, TransactionLine,
};

use crate::error::{ClientError, ClientResult};

/// Error body produced by the service.
#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    barcode: &'a str,
    #[serde(flatten)]
    overrides: &'a ProductOverrides,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(ApiClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends path segments, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.message),
            Err(_) => (
                "UNKNOWN".to_string(),
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    text
                },
            ),
        };

        debug!(status = status.as_u16(), %code, "Request rejected");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }

    // ===== Catalog =====

    pub async fn register(
        &self,
        barcode: &str,
        overrides: &ProductOverrides,
    ) -> ClientResult<Product> {
        let body = RegisterBody { barcode, overrides };
        let response = self
            .client
            .post(self.url(&["api", "products"])?)
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        let response = self.client.get(self.url(&["api", "products"])?).send().await?;
        Self::handle_response(response).await
    }

    /// The most recently registered product, or `None` on an empty catalog.
    pub async fn latest(&self) -> ClientResult<Option<Product>> {
        let response = self
            .client
            .get(self.url(&["api", "products", "latest"])?)
            .send()
            .await?;

        match Self::handle_response(response).await {
            Ok(product) => Ok(Some(product)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_barcode(&self, barcode: &str) -> ClientResult<Product> {
        let response = self
            .client
            .get(self.url(&["api", "products", "barcode", barcode])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_by_id(&self, id: i64) -> ClientResult<Product> {
        let id = id.to_string();
        let response = self
            .client
            .get(self.url(&["api", "products", &id])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn update(&self, id: i64, update: &ProductUpdate) -> ClientResult<Ack> {
        let id = id.to_string();
        let response = self
            .client
            .put(self.url(&["api", "products", &id])?)
            .json(update)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Ack> {
        let id = id.to_string();
        let response = self
            .client
            .delete(self.url(&["api", "products", &id])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    // ===== Checkout & Ledger =====

    pub async fn checkout(&self, items: Vec<CheckoutItem>) -> ClientResult<CheckoutReceipt> {
        let response = self
            .client
            .post(self.url(&["api", "transaction"])?)
            .json(&CheckoutRequest { items })
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Newest ledger lines first.
    pub async fn history(&self, limit: i64) -> ClientResult<Vec<TransactionLine>> {
        let response = self
            .client
            .get(self.url(&["api", "transactions"])?)
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    // ===== System =====

    pub async fn server_ip(&self) -> ClientResult<ServerAddress> {
        let response = self
            .client
            .get(self.url(&["api", "server-ip"])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let response = self.client.get(self.url(&["health"])?).send().await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let api = client("http://127.0.0.1:5000");
        assert_eq!(
            api.url(&["api", "products", "42"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/products/42"
        );

        let api = client("http://127.0.0.1:5000/pos/");
        assert_eq!(
            api.url(&["health"]).unwrap().as_str(),
            "http://127.0.0.1:5000/pos/health"
        );
    }

    #[test]
    fn test_url_encodes_barcode() {
        let api = client("http://localhost:5000");
        let url = api.url(&["api", "products", "barcode", "AB/12 3"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/products/barcode/AB%2F12%203"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:ops@example.com", Duration::from_secs(1)),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
