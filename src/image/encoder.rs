//! Turns a selected image into its transport-safe encoding.

use crate::error::{MockupError, Result};
use crate::image::types::{EncodedImage, ImageResource};
use base64::Engine;

/// Reads `resource` to completion and encodes it for the generation request.
///
/// The bytes are rendered as a data URL and the payload is taken from after
/// the first comma, so an empty resource fails with
/// [`MockupError::MalformedEncoding`].
pub async fn encode(resource: &ImageResource) -> Result<EncodedImage> {
    let bytes = resource.read().await.map_err(MockupError::ReadFailure)?;
    let data_url = to_data_url(resource.mime_type(), &bytes);
    let data = payload_from_data_url(&data_url)?;

    tracing::debug!(
        mime_type = resource.mime_type(),
        bytes = bytes.len(),
        encoded_len = data.len(),
        "encoded image resource"
    );

    Ok(EncodedImage {
        mime_type: resource.mime_type().to_string(),
        data: data.to_string(),
    })
}

/// Renders bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Returns everything after the first comma of a data URL.
///
/// The header before the comma is ignored.
pub fn payload_from_data_url(data_url: &str) -> Result<&str> {
    match data_url.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => Ok(payload),
        _ => Err(MockupError::MalformedEncoding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_encode_keeps_declared_mime_type() {
        // Declared type wins even when the bytes say otherwise.
        let resource = ImageResource::from_bytes(PNG_BYTES.to_vec(), "image/jpeg");
        let encoded = encode(&resource).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_encode_round_trips_bytes() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let resource = ImageResource::from_bytes(bytes.clone(), "image/png");
        let encoded = encode(&resource).await.unwrap();

        assert!(!encoded.data.starts_with("data:"));
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&encoded.data)
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[tokio::test]
    async fn test_encode_empty_resource_is_malformed() {
        let resource = ImageResource::from_bytes(Vec::new(), "image/png");
        let err = encode(&resource).await.unwrap_err();
        assert!(matches!(err, MockupError::MalformedEncoding));
    }

    #[tokio::test]
    async fn test_encode_file_resource() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        tokio::fs::write(&path, PNG_BYTES).await.unwrap();

        let resource = ImageResource::from_path(&path).await;
        let encoded = encode(&resource).await.unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.data, "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_encode_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");
        let resource = ImageResource::from_path_with_mime(missing, "image/png");

        match encode(&resource).await {
            Err(MockupError::ReadFailure(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected ReadFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_without_comma_is_malformed() {
        assert!(matches!(
            payload_from_data_url("data:image/png;base64"),
            Err(MockupError::MalformedEncoding)
        ));
        assert!(matches!(
            payload_from_data_url("data:image/png;base64,"),
            Err(MockupError::MalformedEncoding)
        ));
    }

    #[test]
    fn test_payload_splits_on_first_comma() {
        assert_eq!(payload_from_data_url("data:x;base64,AB,CD").unwrap(), "AB,CD");
        assert_eq!(
            payload_from_data_url(&to_data_url("image/png", &PNG_BYTES)).unwrap(),
            "iVBORw0KGgo="
        );
    }
}
