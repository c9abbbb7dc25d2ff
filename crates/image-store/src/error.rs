use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Request to the asset host failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The asset host rejected the request: {0}")]
    Rejected(String),

    #[error("The asset host returned no result")]
    EmptyResult,

    #[error("Failed to write the image to disk: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a location this store produced: {0}")]
    UnknownLocation(String),
}
