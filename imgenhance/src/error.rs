use imageproc::image::ImageError;

/// Errors produced while loading, enhancing, encoding or storing an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported enhancement: {0}")]
    UnsupportedOperation(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("failed to decode image")]
    Decode(#[source] ImageError),
    #[error("failed to encode PNG")]
    Encode(#[source] ImageError),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
