use crate::{
    error::{ImageGenError, Result},
    models::{GenerationRequest, ImageGenerationResponse},
    provider::ImageGenerationClient,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

#[derive(Debug, Clone)]
pub enum MockReply {
    /// Returned base64-encoded.
    Image(Vec<u8>),
    RawBase64(String),
    Status(u16),
    EmptyData,
}

/// Scripted client keyed by prompt. Unscripted prompts get their own text
/// back as image bytes.
#[derive(Default)]
pub struct MockImageClient {
    replies: HashMap<String, MockReply>,
    barrier: Option<Barrier>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, prompt: &str, reply: MockReply) -> Self {
        self.replies.insert(prompt.to_string(), reply);
        self
    }

    /// Every call waits until `n` calls are in flight at once.
    pub fn with_barrier(mut self, n: usize) -> Self {
        self.barrier = Some(Barrier::new(n));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerationClient for MockImageClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageGenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        tokio::task::yield_now().await;

        let reply = self
            .replies
            .get(request.prompt())
            .cloned()
            .unwrap_or_else(|| MockReply::Image(request.prompt().as_bytes().to_vec()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let image_data = match reply {
            MockReply::Image(bytes) => STANDARD.encode(bytes),
            MockReply::RawBase64(raw) => raw,
            MockReply::Status(status) => {
                return Err(ImageGenError::ApiError {
                    status,
                    body: format!("mock status {}", status),
                })
            }
            MockReply::EmptyData => {
                return Err(ImageGenError::ResponseError(
                    "No image data returned from API".into(),
                ))
            }
        };

        Ok(ImageGenerationResponse {
            image_data,
            model: "mock-image-1".to_string(),
            revised_prompt: None,
        })
    }
}
