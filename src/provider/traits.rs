//! Common traits for image generation providers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text-to-image generation providers
///
/// An asset reference is the URL the provider returns for a produced image.
/// Every call is a fresh billable job on the provider side; there is no retry
/// or batching at this layer.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a new image from a prompt
    async fn generate(&self, model_tag: &str, prompt: &str) -> Result<String>;

    /// Regenerate an image from a prompt plus reference images
    async fn regenerate(
        &self,
        model_tag: &str,
        prompt: &str,
        reference_images: &[String],
    ) -> Result<String>;
}
