//! Gemini image-edit client.

use crate::error::{MockupError, Result, TransportError};
use crate::generator::transport::{HttpTransport, Transport, DEFAULT_BASE_URL};
use crate::generator::wire::{first_inline_image, missing_image_reason, GenerateContentRequest};
use crate::image::{EncodedImage, GenerationRequest, GenerationResult};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Environment variables consulted by [`GeneratorConfig::from_env`], in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GOOGLE_API_KEY"];

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "nano-banana-pro-preview",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for a [`GeneratorClient`].
#[derive(Clone, Default)]
pub struct GeneratorConfig {
    /// Service credential. Checked when a request is made.
    pub api_key: Option<String>,
    /// Model to call.
    pub model: GeminiModel,
    /// API endpoint; `None` means the public Gemini API.
    pub base_url: Option<String>,
}

impl GeneratorConfig {
    /// Resolves the credential from `API_KEY`, then `GOOGLE_API_KEY`.
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for GeneratorClient.
#[derive(Default)]
pub struct GeneratorClientBuilder {
    config: GeneratorConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl GeneratorClientBuilder {
    /// Creates a new builder with default settings and no credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.config.model = model;
        self
    }

    /// Overrides the API endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Replaces the HTTP transport, e.g. with a stub in tests.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    ///
    /// A missing credential is not an error here; it is reported by
    /// [`GeneratorClient::generate`] before anything is sent.
    pub fn build(self) -> Result<GeneratorClient> {
        let transport = match self.transport {
            Some(t) => t,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(TransportError::from)?;
                let base_url = self
                    .config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                Arc::new(HttpTransport::new(client, base_url))
            }
        };

        Ok(GeneratorClient {
            transport,
            api_key: self.config.api_key,
            model: self.config.model,
        })
    }
}

/// Sends an encoded image and a prompt to Gemini and returns the edited image.
#[derive(Clone)]
pub struct GeneratorClient {
    transport: Arc<dyn Transport>,
    api_key: Option<String>,
    model: GeminiModel,
}

impl fmt::Debug for GeneratorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorClient")
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GeneratorClient {
    /// Creates a new `GeneratorClientBuilder`.
    pub fn builder() -> GeneratorClientBuilder {
        GeneratorClientBuilder::new()
    }

    /// Returns the configured model.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    /// Edits `image` according to `prompt`.
    pub async fn generate(&self, image: &EncodedImage, prompt: &str) -> Result<GenerationResult> {
        self.execute(&GenerationRequest::new(image.clone(), prompt)).await
    }

    /// Runs a prepared request. Makes exactly one call to the service.
    pub async fn execute(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(MockupError::MissingCredential)?;

        if request.prompt.trim().is_empty() {
            return Err(MockupError::InvalidRequest("prompt must not be empty".into()));
        }

        let start = Instant::now();
        let body = GenerateContentRequest::from_generation_request(request);

        tracing::info!(
            model = self.model.as_str(),
            mime_type = %request.image.mime_type,
            prompt_len = request.prompt.len(),
            "requesting image edit"
        );

        let response = self
            .transport
            .generate_content(self.model.as_str(), api_key, &body)
            .await?;

        let inline = first_inline_image(&response).ok_or_else(|| {
            let reason = missing_image_reason(&response);
            tracing::warn!(reason = ?reason, "response carried no image");
            MockupError::NoImageInResponse { reason }
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            mime_type = %inline.mime_type,
            "image edit complete"
        );

        GenerationResult::new(inline.data.clone(), inline.mime_type.clone())
            .ok_or(MockupError::NoImageInResponse { reason: None })
    }
}
