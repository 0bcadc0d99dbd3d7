use thiserror::Error;

/// Why a stats request produced no value.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("GitHub API returned HTTP {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("response is missing {0}")]
    MissingField(&'static str),

    #[error("client unavailable: {0}")]
    Unavailable(String),

    #[error("GitHub API reported errors: {0}")]
    Api(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Http(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
