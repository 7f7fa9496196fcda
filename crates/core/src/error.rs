use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("ocr request failed: {0}")]
    OcrFailed(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
