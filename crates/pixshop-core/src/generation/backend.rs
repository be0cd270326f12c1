//! Generation backend service trait.
//!
//! Defines the interface the request controller uses to reach the remote
//! image-synthesis service. The concrete Gemini client lives in the
//! interaction crate; tests substitute a mock.

use crate::error::Result;
use crate::history::GroundingReference;

/// Options accompanying a generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// System instruction sent alongside the request.
    pub system_instruction: Option<String>,
    /// Directives the result should avoid; folded into the outbound prompt.
    pub negative_prompt: Option<String>,
}

/// A source image for an image-conditioned call.
#[derive(Debug, Clone)]
pub struct SourceImage<'a> {
    pub data: &'a [u8],
    pub mime_type: &'a str,
}

/// A decoded result from the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Citations returned with the result, in service order.
    pub grounding: Vec<GroundingReference>,
    /// Any text the model returned alongside the image.
    pub model_text: Option<String>,
}

/// Remote image-synthesis service.
///
/// Implementations must not retain request data beyond the call and must
/// map transport failures to [`PixshopError::Service`](crate::PixshopError).
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Text-to-image: produce an image from a prompt alone.
    async fn generate_from_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImage>;

    /// Image-conditioned generation: modify an existing image per the prompt.
    async fn edit_image(
        &self,
        source: SourceImage<'_>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImage>;
}
