//! Image resources, their encoding, and generated results.

pub mod encoder;
mod types;

pub use encoder::encode;
pub use types::{
    EncodedImage, GenerationRequest, GenerationResult, ImageFormat, ImageResource,
    FALLBACK_MIME_TYPE,
};
