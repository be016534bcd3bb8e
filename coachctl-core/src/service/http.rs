//! REST client for the coaching API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BatchService;
use crate::error::{CoachError, Result};
use crate::model::{Batch, BatchId, BatchStatus, NewBatch};

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: BatchStatus,
}

/// `BatchService` backed by the coaching REST API
#[derive(Debug, Clone)]
pub struct HttpBatchService {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpBatchService {
    /// Build a client for `endpoint` (e.g. `https://api.example.com/v1`)
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| CoachError::config(format!("invalid API endpoint '{}': {}", endpoint, e)))?;

        if endpoint.cannot_be_a_base() {
            return Err(CoachError::config(format!(
                "API endpoint '{}' cannot be used as a base URL",
                endpoint
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// `{endpoint}/coachings/{coaching_id}/batches/{extra...}` with each segment escaped
    fn batches_url(&self, coaching_id: &str, extra: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // cannot_be_a_base was rejected in new(), so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["coachings", coaching_id, "batches"])
                .extend(extra);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str, id: &str) -> Result<T> {
        debug!(url = %url, "GET");
        let response = self.authorize(self.client.get(url)).send().await?;
        handle_response(response, what, id).await
    }
}

/// Map a response to a value or a structured error
async fn handle_response<T: DeserializeOwned>(response: Response, what: &str, id: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        return serde_json::from_slice(&body).map_err(|e| CoachError::json(what.to_string(), e));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(CoachError::not_found(what, id));
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(api_error(status, &text))
}

fn api_error(status: StatusCode, body: &str) -> CoachError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };
    CoachError::api(status.as_u16(), message)
}

#[async_trait]
impl BatchService for HttpBatchService {
    async fn list_batches(
        &self,
        coaching_id: &str,
        status: Option<BatchStatus>,
    ) -> Result<Vec<Batch>> {
        let mut url = self.batches_url(coaching_id, &[]);
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        self.get_json(url, "coaching", coaching_id).await
    }

    async fn get_my_batches(&self, coaching_id: &str) -> Result<Vec<Batch>> {
        let url = self.batches_url(coaching_id, &["mine"]);
        self.get_json(url, "coaching", coaching_id).await
    }

    async fn create_batch(&self, coaching_id: &str, draft: NewBatch) -> Result<Batch> {
        draft.validate()?;

        let url = self.batches_url(coaching_id, &[]);
        debug!(url = %url, name = %draft.name, "POST");
        let response = self
            .authorize(self.client.post(url))
            .json(&draft)
            .send()
            .await?;
        handle_response(response, "coaching", coaching_id).await
    }

    async fn get_batch(&self, coaching_id: &str, batch_id: &BatchId) -> Result<Batch> {
        let url = self.batches_url(coaching_id, &[batch_id.as_str()]);
        self.get_json(url, "batch", batch_id.as_str()).await
    }

    async fn set_batch_status(
        &self,
        coaching_id: &str,
        batch_id: &BatchId,
        status: BatchStatus,
    ) -> Result<Batch> {
        let url = self.batches_url(coaching_id, &[batch_id.as_str()]);
        debug!(url = %url, status = %status, "PATCH");
        let response = self
            .authorize(self.client.patch(url))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        handle_response(response, "batch", batch_id.as_str()).await
    }
}
