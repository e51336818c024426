use thiserror::Error;

/// Raised when the inbound bytes are not an admission review this webhook can handle.
/// The transport reports it to the caller as a client error.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("could not decode admission review: {0}")]
    Json(#[source] serde_json::Error),

    #[error("admission review does not contain a request")]
    MissingRequest,

    #[error("admission review request is invalid: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}

/// Raised when the outbound admission review cannot be built.
/// The transport reports it to the caller as a server error.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("could not marshal patch: {0}")]
    Patch(#[source] serde_json::Error),

    #[error("could not marshal response: {0}")]
    Review(#[source] serde_json::Error),
}
