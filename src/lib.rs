#![warn(missing_docs)]
//! mockupgen - edit an image with a text prompt using Gemini.
//!
//! The crate covers the request/response path of a mockup generator: a
//! selected image is base64 encoded, sent to Gemini together with a free-text
//! instruction, and the first image in the reply is handed back.
//!
//! # Quick Start
//!
//! ```no_run
//! use mockupgen::{GeneratorClient, GeneratorConfig, ImageResource, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> mockupgen::Result<()> {
//!     let client = GeneratorClient::builder()
//!         .config(GeneratorConfig::from_env())
//!         .build()?;
//!     let pipeline = Pipeline::new(client);
//!
//!     let logo = ImageResource::from_path("logo.png").await;
//!     let result = pipeline
//!         .generate(&logo, "Place this logo on a black t-shirt")
//!         .await?;
//!     result.save("generated-mockup.png").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `mockupgen` command-line tool.

mod error;
pub mod generator;
pub mod image;
mod pipeline;

pub use error::{MockupError, Result, TransportError};
pub use generator::{
    GeminiModel, GeneratorClient, GeneratorClientBuilder, GeneratorConfig, HttpTransport,
    Transport,
};
pub use image::{
    encode, EncodedImage, GenerationRequest, GenerationResult, ImageFormat, ImageResource,
};
pub use pipeline::Pipeline;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{MockupError, Result};
    pub use crate::generator::{GeneratorClient, GeneratorConfig};
    pub use crate::image::{encode, EncodedImage, GenerationResult, ImageResource};
    pub use crate::pipeline::Pipeline;
}
