use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;


/// Fatal failures talking to the listens service
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid API url `{0}`")]
    InvalidUrl(String),

    #[error("request failed")]
    Network(#[from] reqwest::Error),

    #[error("service responded with {0}")]
    Status(StatusCode),

    #[error("unexpected response body")]
    Decode(#[from] serde_json::Error),

    #[error("the provided token is not valid: {0}")]
    InvalidToken(String),
}

/// A single listen could not be deleted
#[derive(Debug, Error)]
pub enum DeleteFailure {
    #[error("delete request failed")]
    Transport(#[from] reqwest::Error),

    #[error("service responded with {0}")]
    Status(StatusCode),
}
