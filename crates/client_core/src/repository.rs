//! Repository adapter: translates core calls into the HTTP/JSON contract of
//! the product repository and maps failures onto the error taxonomy. No
//! business logic lives here.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Product, ProductDraft, ProductId},
    error::CatalogError,
    protocol::{ApiEnvelope, ErrorBody, HealthResponse, ListProductsQuery},
};
use std::time::Duration;
use url::Url;

/// Boundary trait in front of the durable product store. The HTTP adapter is
/// the production implementation; tests script their own fakes against it.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, query: &ListProductsQuery) -> Result<Vec<Product>, CatalogError>;
    async fn get(&self, id: &ProductId) -> Result<Product, CatalogError>;
    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError>;
    async fn update(&self, id: &ProductId, draft: &ProductDraft)
        -> Result<Product, CatalogError>;
    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError>;
    async fn health(&self) -> Result<HealthResponse, CatalogError>;
}

/// reqwest-backed adapter for the REST repository contract.
#[derive(Debug)]
pub struct HttpProductRepository {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProductRepository {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    /// Timeouts are a transport concern and live on the underlying client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|err| {
            CatalogError::Transport(format!("invalid repository base url '{base_url}': {err}"))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        Ok(Self { http, base_url })
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    /// The health probe lives beside the API root, not under it.
    fn health_url(&self) -> String {
        let root = self.base_url.strip_suffix("/api").unwrap_or(&self.base_url);
        format!("{root}/health")
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, CatalogError> {
        request
            .send()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))
    }
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String), CatalogError> {
    let status = response.status();
    let body = response.text().await.map_err(|err| {
        CatalogError::Transport(format!("failed to read repository response: {err}"))
    })?;
    Ok((status, body))
}

fn error_from_status(status: StatusCode, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        });
    if status == StatusCode::NOT_FOUND {
        CatalogError::NotFound(message)
    } else if status.is_client_error() {
        CatalogError::Validation(message)
    } else {
        CatalogError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// Unwraps `{ success, data }` and surfaces every anomaly distinctly.
async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogError> {
    let (status, body) = read_body(response).await?;
    if !status.is_success() {
        return Err(error_from_status(status, &body));
    }
    let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|err| {
        CatalogError::UnexpectedResponse(format!("undecodable repository envelope: {err}"))
    })?;
    if !envelope.success {
        return Err(CatalogError::UnexpectedResponse(
            envelope
                .message
                .unwrap_or_else(|| "repository reported failure without a message".to_string()),
        ));
    }
    envelope.data.ok_or_else(|| {
        CatalogError::UnexpectedResponse("repository envelope carried no data".to_string())
    })
}

/// Like [`read_data`] but for acknowledgement-only responses (delete).
async fn read_ack(response: reqwest::Response) -> Result<(), CatalogError> {
    let (status, body) = read_body(response).await?;
    if !status.is_success() {
        return Err(error_from_status(status, &body));
    }
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body).map_err(|err| {
        CatalogError::UnexpectedResponse(format!("undecodable repository envelope: {err}"))
    })?;
    if !envelope.success {
        return Err(CatalogError::UnexpectedResponse(
            envelope
                .message
                .unwrap_or_else(|| "repository reported failure without a message".to_string()),
        ));
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for HttpProductRepository {
    async fn list(&self, query: &ListProductsQuery) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .send(self.http.get(self.products_url()).query(query))
            .await?;
        read_data(response).await
    }

    async fn get(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let response = self.send(self.http.get(self.product_url(id))).await?;
        read_data(response).await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError> {
        let response = self
            .send(self.http.post(self.products_url()).json(draft))
            .await?;
        read_data(response).await
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, CatalogError> {
        let response = self
            .send(self.http.put(self.product_url(id)).json(draft))
            .await?;
        read_data(response).await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        let response = self.send(self.http.delete(self.product_url(id))).await?;
        read_ack(response).await
    }

    async fn health(&self) -> Result<HealthResponse, CatalogError> {
        let (status, body) = read_body(self.send(self.http.get(self.health_url())).await?).await?;
        if !status.is_success() {
            return Err(error_from_status(status, &body));
        }
        serde_json::from_str(&body).map_err(|err| {
            CatalogError::UnexpectedResponse(format!("undecodable health payload: {err}"))
        })
    }
}
