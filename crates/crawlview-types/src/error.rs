use std::fmt;

/// Result type for crawlview-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// JSON document could not be decoded
    Json(serde_json::Error),

    /// `owner/repo` selector is malformed
    InvalidRepo(String),

    /// Viewer configuration failed validation
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::InvalidRepo(msg) => write!(f, "Invalid repository selector: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid viewer config: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::InvalidRepo(_) | Error::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
