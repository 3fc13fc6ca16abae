/**
 * HTTP Transport
 *
 * Talks to the version log routes served by `xfpad-server`:
 *
 * - `GET /docs/{doc_id}` - attach
 * - `PUT /docs/{doc_id}/commits` - submit
 * - `GET /docs/{doc_id}/commits/{index}` - long-poll, 204 when the wait ran out
 *
 * Error statuses map onto `TransportError`: 409 is a stale parent, 410 a
 * closed document, 5xx a retryable server failure, anything else a rejection.
 */

use super::CommitTransport;
use crate::client::config::Config;
use crate::client::error::TransportError;
use crate::shared::{Commit, CommitReceipt, CommitRequest, DocumentSnapshot};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// Extra time allowed on top of the server's long-poll window
const FETCH_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Version log client over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: Config,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `{server}/docs/{doc_id}/{tail..}`, with the document id escaped as one
    /// path segment
    fn doc_url(&self, doc_id: &str, tail: &[&str]) -> Result<Url, TransportError> {
        let server_url = self.config.server_url();
        let mut url = Url::parse(server_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", server_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(server_url.to_string()))?
            .pop_if_empty()
            .push("docs")
            .push(doc_id)
            .extend(tail);
        Ok(url)
    }

    async fn error_for(response: Response) -> TransportError {
        let status = response.status();
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text),
            Err(_) => status.to_string(),
        };

        match status {
            StatusCode::CONFLICT => TransportError::StaleParent(message),
            StatusCode::GONE => TransportError::Closed(message),
            s if s.is_server_error() => TransportError::Server {
                status: s.as_u16(),
                message,
            },
            s => TransportError::Rejected {
                status: s.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl CommitTransport for HttpTransport {
    async fn init(&self, doc_id: &str) -> Result<DocumentSnapshot, TransportError> {
        let url = self.doc_url(doc_id, &[])?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(response.json().await?)
    }

    async fn submit(&self, doc_id: &str, request: CommitRequest) -> Result<CommitReceipt, TransportError> {
        let url = self.doc_url(doc_id, &["commits"])?;
        let response = self.client.put(url).json(&request).send().await?;
        if !response.status().is_success() {
            let err = Self::error_for(response).await;
            tracing::warn!("[Sync] {}: submit failed: {}", doc_id, err);
            return Err(err);
        }
        Ok(response.json().await?)
    }

    async fn fetch(&self, doc_id: &str, index: usize) -> Result<Option<Commit>, TransportError> {
        let index = index.to_string();
        let url = self.doc_url(doc_id, &["commits", &index])?;
        let response = self
            .client
            .get(url)
            .timeout(self.config.long_poll() + FETCH_GRACE)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            s if s.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::error_for(response).await),
        }
    }
}
