//! Concurrent batch image generation.
//!
//! A [`BatchImageOrchestrator`] sends every prompt of a batch to an
//! [`ImageGenerationClient`] at once, decodes the base64 images that come back
//! and persists them through a [`BlobStore`], one uniquely named file per image.
//!
//! ```no_run
//! use parallel_images::{BatchImageOrchestrator, GeneratorConfig};
//!
//! # async fn run() -> parallel_images::Result<()> {
//! let config = GeneratorConfig::from_env()?;
//! let generator = BatchImageOrchestrator::from_config(&config)?;
//! let report = generator
//!     .generate_with_defaults(&["A cute kitten playing with a ball of yarn"])
//!     .await;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod provider;
pub mod storage;

pub use config::GeneratorConfig;
pub use error::{ImageGenError, Result};
pub use models::{
    BatchReport, GenerationRequest, GenerationResult, ImageGenerationResponse, ImageQuality,
    ImageSize, StoredImage,
};
pub use orchestrator::BatchImageOrchestrator;
pub use provider::{ImageGenerationClient, OpenAiImageClient};
pub use storage::{BlobStore, FsBlobStore, IdStrategy};
