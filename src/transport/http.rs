use super::{TransportClient, TransportError};
use crate::types::{GenerationResult, ProviderMetadata};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Expected shape of the provider proxy's JSON reply.
#[derive(Debug, Deserialize)]
struct ProviderReply {
    text: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

/// Reqwest-backed [`TransportClient`] posting payloads to a provider proxy.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn call(&self, payload: &serde_json::Value) -> Result<GenerationResult, TransportError> {
        let client_request_id = Uuid::new_v4().to_string();
        let mut req = self.client.post(&self.endpoint).json(payload);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        // Correlation id; the proxy may ignore it but applications can use
        // it for linkage across logs.
        req = req.header("x-genrelay-request-id", &client_request_id);

        let resp = req.send().await.map_err(|e| {
            // reqwest surfaces connect failures and timeouts here; both mean
            // no response was received
            TransportError::Network(e.to_string())
        })?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(
                http_status = status,
                request_id = client_request_id.as_str(),
                "provider call failed"
            );
            return Err(TransportError::Status {
                status,
                message: body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let reply: ProviderReply = serde_json::from_slice(&body)
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        debug!(
            http_status = status,
            request_id = client_request_id.as_str(),
            "provider call succeeded"
        );

        let metadata = ProviderMetadata {
            model: reply.model,
            request_id: reply.request_id.or(Some(client_request_id)),
            usage: reply.usage,
        };
        Ok(GenerationResult {
            text: reply.text,
            metadata: Some(metadata),
        })
    }
}
