use std::fmt;

/// Result type for crawlview-ingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting a dataset stream
#[derive(Debug)]
pub enum Error {
    /// Reading from the underlying byte stream failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "Stream read error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
