use crate::{
    config::GeneratorConfig,
    error::{ImageGenError, Result},
    logger,
    models::{
        BatchReport, GenerationRequest, GenerationResult, ImageQuality, ImageSize, StoredImage,
    },
    provider::{ImageGenerationClient, OpenAiImageClient},
    storage::{BlobStore, FsBlobStore, IdStrategy},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;
use std::sync::Arc;

/// Fans a list of prompts out to the image client and saves every image that
/// comes back.
///
/// All per-prompt work runs as futures on the caller's task and is joined
/// before returning, so a batch call never outlives its requests. Failures are
/// isolated: each prompt ends as exactly one [`GenerationResult`], and only a
/// missing credential (checked at construction) is reported as an `Err`.
pub struct BatchImageOrchestrator {
    client: Arc<dyn ImageGenerationClient>,
    store: Arc<dyn BlobStore>,
    id_strategy: IdStrategy,
    size: ImageSize,
    quality: ImageQuality,
}

impl BatchImageOrchestrator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let client = OpenAiImageClient::new(config)?;
        let store = FsBlobStore::new(&config.output_dir)?;
        Self::with_backends(config, Arc::new(client), Arc::new(store))
    }

    pub fn with_backends(
        config: &GeneratorConfig,
        client: Arc<dyn ImageGenerationClient>,
        store: Arc<dyn BlobStore>,
    ) -> Result<Self> {
        config.require_api_key()?;

        Ok(Self {
            client,
            store,
            id_strategy: config.id_strategy,
            size: config.size,
            quality: config.quality,
        })
    }

    pub fn default_size(&self) -> ImageSize {
        self.size
    }

    pub fn default_quality(&self) -> ImageQuality {
        self.quality
    }

    /// Runs every prompt concurrently and waits for all of them.
    pub async fn generate<S: AsRef<str>>(
        &self,
        prompts: &[S],
        size: ImageSize,
        quality: ImageQuality,
    ) -> BatchReport {
        if prompts.is_empty() {
            log::debug!("Empty prompt list, nothing to generate");
            return BatchReport::default();
        }

        let _timer = logger::timer(&format!("batch of {} prompts", prompts.len()));
        log::info!(
            "Submitting {} prompts ({}, {})",
            prompts.len(),
            size,
            quality
        );

        let tasks = prompts
            .iter()
            .enumerate()
            .map(|(index, prompt)| self.run_prompt(index, prompt.as_ref(), size, quality));

        let report = BatchReport::new(join_all(tasks).await);
        log_summary(&report);
        report
    }

    pub async fn generate_with_defaults<S: AsRef<str>>(&self, prompts: &[S]) -> BatchReport {
        self.generate(prompts, self.size, self.quality).await
    }

    /// Same report shape as [`generate`](Self::generate), one request at a time.
    pub async fn generate_sequential<S: AsRef<str>>(
        &self,
        prompts: &[S],
        size: ImageSize,
        quality: ImageQuality,
    ) -> BatchReport {
        if prompts.is_empty() {
            return BatchReport::default();
        }

        let _timer = logger::timer(&format!("sequential run of {} prompts", prompts.len()));

        let mut results = Vec::with_capacity(prompts.len());
        for (index, prompt) in prompts.iter().enumerate() {
            results.push(self.run_prompt(index, prompt.as_ref(), size, quality).await);
        }

        let report = BatchReport::new(results);
        log_summary(&report);
        report
    }

    /// Single prompt, with the error returned rather than folded into a result.
    pub async fn generate_one(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<StoredImage> {
        self.generate_and_store(prompt, size, quality)
            .await
            .map(|(image, _)| image)
    }

    async fn run_prompt(
        &self,
        index: usize,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> GenerationResult {
        match self.generate_and_store(prompt, size, quality).await {
            Ok((image, payload)) => {
                log::debug!("Prompt {} stored as {}", index, image.identifier);
                GenerationResult::Success {
                    index,
                    image,
                    payload,
                }
            }
            Err(e) => {
                log::debug!("Prompt {} failed: {}", index, e);
                GenerationResult::Failure {
                    index,
                    prompt: prompt.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn generate_and_store(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<(StoredImage, Vec<u8>)> {
        let request = GenerationRequest::new(prompt, size, quality)?;
        let response = self.client.generate(&request).await?;

        if let Some(revised) = &response.revised_prompt {
            log::debug!("Model revised prompt to: {}", revised);
        }

        let payload = decode_image(&response.image_data)?;
        let identifier = self.id_strategy.next_id();
        let path = self.store.write(&identifier, &payload).await?;

        Ok((StoredImage { identifier, path }, payload))
    }
}

pub fn decode_image(image_data: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD.decode(image_data.trim()).map_err(|e| {
        ImageGenError::DecodeError(format!("Invalid base64 image payload: {}", e))
    })?;

    if bytes.is_empty() {
        return Err(ImageGenError::DecodeError("Image payload is empty".into()));
    }
    Ok(bytes)
}

fn log_summary(report: &BatchReport) {
    log::info!("{}", report.summary_line());
    for (index, error) in report.failures() {
        log::warn!("  prompt {}: {}", index, error);
    }
    for path in report.successful_paths() {
        log::info!("  → {}", path.display());
    }
}
