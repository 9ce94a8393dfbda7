use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
