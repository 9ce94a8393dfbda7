use crate::{
    config::GeneratorConfig,
    error::{ImageGenError, Result},
    models::{
        GenerationRequest, ImageGenerationResponse, OpenAiImageRequest, OpenAiImageResponse,
    },
    provider::ImageGenerationClient,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

/// Client for `POST {api_base}/images/generations`.
///
/// Holds one `reqwest::Client`, so every request in a batch shares the same
/// connection pool. The pool is released when this client is dropped.
pub struct OpenAiImageClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                ImageGenError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Self::with_http_client(config, client)
    }

    pub fn with_http_client(config: &GeneratorConfig, client: Client) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.api_base)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|_| {
            ImageGenError::ConfigError("API key contains characters not allowed in a header".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Pulls the first image out of a successful response body.
    pub fn parse_response(model: &str, body: &str) -> Result<ImageGenerationResponse> {
        let parsed: OpenAiImageResponse = serde_json::from_str(body)
            .map_err(|e| ImageGenError::ResponseError(format!("Malformed response body: {}", e)))?;

        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageGenError::ResponseError("No image data returned from API".into()))?;

        let image_data = first
            .b64_json
            .filter(|b64| !b64.trim().is_empty())
            .ok_or_else(|| ImageGenError::ResponseError("Response is missing b64_json".into()))?;

        Ok(ImageGenerationResponse {
            image_data,
            model: model.to_string(),
            revised_prompt: first.revised_prompt,
        })
    }
}

#[async_trait]
impl ImageGenerationClient for OpenAiImageClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageGenerationResponse> {
        let payload = OpenAiImageRequest {
            model: &self.model,
            prompt: request.prompt(),
            size: request.size(),
            quality: request.quality(),
            n: 1,
        };

        let request_json = serde_json::to_vec(&payload)
            .map_err(|e| ImageGenError::SerializationError(e.to_string()))?;

        log::info!(
            "Generating image with model: {} ({}, {})",
            self.model,
            request.size(),
            request.quality()
        );

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .body(request_json)
            .send()
            .await
            .map_err(|e| ImageGenError::RequestError(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageGenError::RequestError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::debug!("OpenAI returned {}: {}", status, body);
            return Err(ImageGenError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_response(&self.model, &body)
    }
}
