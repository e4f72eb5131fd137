//! Remote image generation.

mod client;
pub mod transport;
pub mod wire;

pub use client::{
    GeminiModel, GeneratorClient, GeneratorClientBuilder, GeneratorConfig, API_KEY_ENV_VARS,
};
pub use transport::{HttpTransport, Transport, DEFAULT_BASE_URL};
pub use wire::first_inline_image;
