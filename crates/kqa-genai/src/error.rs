use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generation service returned no content")]
    EmptyResponse,
    #[error("failed to parse generated content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid inline image data: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}
