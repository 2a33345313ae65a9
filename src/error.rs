use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures reported by the content source, AI and publishing collaborators.
/// The pipeline turns these into record state; they never reach the views as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Source unreachable: {0}")]
    Unreachable(String),

    #[error("Rate limited by remote service")]
    RateLimited,

    #[error("No results")]
    EmptyResult,

    #[error("Quota exceeded")]
    QuotaExceeded,

    #[error("Invalid API key")]
    InvalidKey,

    #[error("Content rejected by policy: {0}")]
    ContentPolicyRejected(String),

    #[error("Account credentials expired")]
    AuthExpired,

    #[error("Remote validation failed: {0}")]
    RemoteValidation(String),

    #[error("Transient network failure")]
    TransientNetwork,
}
