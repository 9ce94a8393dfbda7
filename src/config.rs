use crate::{
    error::{ImageGenError, Result},
    models::{ImageQuality, ImageSize},
    storage::IdStrategy,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-image-1";
pub const DEFAULT_OUTPUT_DIR: &str = "output/images";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub output_dir: PathBuf,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub id_strategy: IdStrategy,
    pub request_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            size: ImageSize::default(),
            quality: ImageQuality::default(),
            id_strategy: IdStrategy::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every setting from the environment, falling back to defaults for
    /// unset variables. A set-but-invalid value is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GeneratorConfig::from_env`], reading variables through
    /// `lookup`. Keys the lookup hides are never validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("OPENAI_API_KEY");
        if let Some(api_base) = lookup("OPENAI_BASE_URL") {
            config.api_base = api_base;
        }
        if let Some(model) = lookup("OPENAI_IMAGE_MODEL") {
            config.model = model;
        }
        if let Some(dir) = lookup("IMAGE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup("IMAGE_SIZE") {
            config.size = size.parse()?;
        }
        if let Some(quality) = lookup("IMAGE_QUALITY") {
            config.quality = quality.parse()?;
        }
        if let Some(strategy) = lookup("IMAGE_ID_STRATEGY") {
            config.id_strategy = strategy.parse()?;
        }
        if let Some(secs) = lookup("IMAGE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_timeout_secs(&secs)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ImageGenError::ConfigError(
                "OPENAI_API_KEY environment variable or api_key parameter required".into(),
            )),
        }
    }

    /// Key with everything but the first few characters hidden, for logs.
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                format!("{}...", key.chars().take(5).collect::<String>())
            }
            _ => "<unset>".to_string(),
        }
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ImageGenError::ConfigError(format!(
            "Invalid IMAGE_REQUEST_TIMEOUT_SECS '{}', expected a positive number of seconds",
            raw
        ))),
    }
}
