use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid Base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Invalid Length")]
    InvalidLength,
    #[error("Invalid ULID")]
    InvalidUlid,
}
