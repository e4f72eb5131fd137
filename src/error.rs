//! Error types for the encode -> generate pipeline.

/// Errors that can occur while encoding an image or generating an edit.
#[derive(Debug, thiserror::Error)]
pub enum MockupError {
    /// The data-URL representation of a resource had no payload after the comma.
    #[error("could not parse base64 data from the image resource")]
    MalformedEncoding,

    /// Reading the image resource failed.
    #[error("failed to read image resource: {0}")]
    ReadFailure(#[source] std::io::Error),

    /// No API key was configured for the generator client.
    #[error("no API key configured (set API_KEY or GOOGLE_API_KEY)")]
    MissingCredential,

    /// The remote call itself failed.
    #[error(transparent)]
    TransportFailure(#[from] TransportError),

    /// The call succeeded but the first candidate carried no inline image data.
    #[error("no image data found in the API response{}", reason_suffix(.reason))]
    NoImageInResponse {
        /// Block or finish reason reported by the service, if any.
        reason: Option<String>,
    },

    /// Request parameters were rejected before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A generated payload was not valid base64.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error outside the resource read (e.g., saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the single outbound call to the generation service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connectivity or protocol failure before a response was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" ({r})"),
        None => String::new(),
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, MockupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MockupError::TransportFailure(TransportError::Api {
            status: 404,
            message: "Not found".into(),
        });
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = MockupError::NoImageInResponse { reason: None };
        assert_eq!(err.to_string(), "no image data found in the API response");

        let err = MockupError::NoImageInResponse {
            reason: Some("IMAGE_SAFETY".into()),
        };
        assert_eq!(
            err.to_string(),
            "no image data found in the API response (IMAGE_SAFETY)"
        );
    }

    #[test]
    fn test_read_failure_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = MockupError::ReadFailure(io);
        let source = err.source().expect("io error should be the source");
        assert_eq!(source.to_string(), "gone");
    }
}
