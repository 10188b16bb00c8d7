//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API key is not a valid header value")]
    InvalidApiKey,
}
