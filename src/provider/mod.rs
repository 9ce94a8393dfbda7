pub mod openai;

#[cfg(test)]
pub mod mock;

use crate::{
    error::Result,
    models::{GenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;

pub use openai::OpenAiImageClient;

/// Text-to-image backend.
///
/// Implementations report a non-2xx status as `ApiError`, a response without
/// image data as `ResponseError` and a transport failure as `RequestError`.
/// The returned payload is still base64; decoding is left to the caller.
#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageGenerationResponse>;
}
