use std::fmt;

/// Result type for crawlview-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Shared model error (repo selector, viewer config, JSON)
    Types(crawlview_types::Error),

    /// Dataset stream could not be consumed
    Ingest(crawlview_ingest::Error),

    /// Transport-level HTTP failure
    Http(reqwest::Error),

    /// Remote answered with a non-success status
    Status { url: String, status: u16 },

    /// Remote document did not have the expected shape
    UnexpectedDocument(String),

    /// URL could not be built or parsed
    InvalidUrl(String),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Invalid operation or state
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "{}", err),
            Error::Ingest(err) => write!(f, "{}", err),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { url, status } => write!(f, "HTTP {} for {}", status, url),
            Error::UnexpectedDocument(msg) => write!(f, "Unexpected document: {}", msg),
            Error::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Ingest(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Status { .. }
            | Error::UnexpectedDocument(_)
            | Error::InvalidUrl(_)
            | Error::Config(_)
            | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<crawlview_types::Error> for Error {
    fn from(err: crawlview_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<crawlview_ingest::Error> for Error {
    fn from(err: crawlview_ingest::Error) -> Self {
        Error::Ingest(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::UnexpectedDocument(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
