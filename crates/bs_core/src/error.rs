use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown model: {0}")]
    Catalog(String),

    #[error("Provisioning error: {0}")]
    Provisioning(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
