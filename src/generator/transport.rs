//! The single outbound call to the generation service.

use crate::error::TransportError;
use crate::generator::wire::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sends one `generateContent` request and returns the decoded response.
///
/// Implementations make exactly one attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the call for `model`, authenticating with `api_key`.
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport targeting `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the endpoint URL for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        let url = self.endpoint(model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The status is the failure; a body that fails to read is just empty.
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "generateContent rejected");
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
