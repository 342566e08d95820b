use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Article, Decisions, SummaryResult};

/// The three calls the selection client makes against the remote service
#[async_trait]
pub trait SelectionApi: Send + Sync {
    async fn list_articles(&self) -> Result<Vec<Article>, ApiError>;

    /// Persist the decisions. The response body must be JSON but is otherwise ignored.
    async fn submit_decisions(&self, decisions: &Decisions) -> Result<(), ApiError>;

    async fn fetch_summaries(&self) -> Result<Vec<SummaryResult>, ApiError>;
}

pub struct HttpSelectionApi {
    client: Client,
    articles_url: Url,
    decisions_url: Url,
    results_url: Url,
}

impl HttpSelectionApi {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            articles_url: config.articles_url()?,
            decisions_url: config.decisions_url()?,
            results_url: config.results_url()?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl SelectionApi for HttpSelectionApi {
    async fn list_articles(&self) -> Result<Vec<Article>, ApiError> {
        self.get_json(&self.articles_url).await
    }

    async fn submit_decisions(&self, decisions: &Decisions) -> Result<(), ApiError> {
        tracing::debug!(url = %self.decisions_url, count = decisions.len(), "POST");
        let response = self
            .client
            .post(self.decisions_url.clone())
            .json(decisions)
            .send()
            .await?;

        read_json::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn fetch_summaries(&self) -> Result<Vec<SummaryResult>, ApiError> {
        self.get_json(&self.results_url).await
    }
}

/// Check the status before touching the body: a JSON error payload on a
/// non-2xx response is still a failure.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))
}
