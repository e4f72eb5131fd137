//! The encode -> generate flow behind the single user action.

use crate::error::Result;
use crate::generator::GeneratorClient;
use crate::image::{encode, GenerationResult, ImageResource};

/// Runs a selected image and a prompt through the encoder and the generator.
///
/// Calls are independent; the pipeline holds no per-call state, so
/// overlapping calls neither block nor affect each other.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: GeneratorClient,
}

impl Pipeline {
    /// Creates a pipeline around a configured client.
    pub fn new(client: GeneratorClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &GeneratorClient {
        &self.client
    }

    /// Encodes `resource` and asks the service to edit it according to `prompt`.
    ///
    /// The remote call is only made once encoding has succeeded.
    pub async fn generate(
        &self,
        resource: &ImageResource,
        prompt: &str,
    ) -> Result<GenerationResult> {
        let encoded = encode(resource).await?;
        self.client.generate(&encoded, prompt).await
    }
}
