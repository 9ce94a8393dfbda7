use crate::error::{ImageGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1536x1024")]
    Landscape,
    #[serde(rename = "1024x1536")]
    Portrait,
    #[serde(rename = "auto")]
    Auto,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Landscape => "1536x1024",
            ImageSize::Portrait => "1024x1536",
            ImageSize::Auto => "auto",
        }
    }

    pub fn all() -> [ImageSize; 4] {
        [
            ImageSize::Square,
            ImageSize::Landscape,
            ImageSize::Portrait,
            ImageSize::Auto,
        ]
    }
}

const SUPPORTED_SIZES: &str = "1024x1024, 1536x1024, 1024x1536, auto";

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize::Portrait
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ImageSize::all()
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ImageGenError::ConfigError(format!(
                    "Unsupported image size '{}', expected one of: {}",
                    s,
                    SUPPORTED_SIZES
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    Medium,
    High,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Low => "low",
            ImageQuality::Medium => "medium",
            ImageQuality::High => "high",
        }
    }
}

impl Default for ImageQuality {
    fn default() -> Self {
        ImageQuality::High
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageQuality {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ImageQuality::Low),
            "medium" => Ok(ImageQuality::Medium),
            "high" => Ok(ImageQuality::High),
            other => Err(ImageGenError::ConfigError(format!(
                "Unsupported image quality '{}', expected low, medium or high",
                other
            ))),
        }
    }
}

/// A single prompt with its rendering options. Fields are private so the
/// non-empty prompt check in [`GenerationRequest::new`] cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    size: ImageSize,
    quality: ImageQuality,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, size: ImageSize, quality: ImageQuality) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ImageGenError::RequestError("Prompt must not be empty".into()));
        }
        Ok(Self {
            prompt,
            size,
            quality,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn quality(&self) -> ImageQuality {
        self.quality
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationResponse {
    pub image_data: String, // Base64 encoded
    pub model: String,
    pub revised_prompt: Option<String>,
}

/// Body of `POST /images/generations`.
#[derive(Debug, Serialize)]
pub struct OpenAiImageRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub n: u8,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageResponse {
    #[serde(default)]
    pub data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageData {
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}
