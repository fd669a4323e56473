use thiserror::Error;

/// Failure reported by an injected metadata source.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential has no payload segment")]
    MissingPayload,

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a json object")]
    NotAnObject,
}
