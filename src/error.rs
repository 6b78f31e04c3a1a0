//! Error types for watch_sync

use std::fmt;

/// Unified error type for watch_sync operations
#[derive(Debug)]
pub enum SyncError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// File I/O error
    Io(std::io::Error),
    /// Feed archive could not be read
    Zip(zip::result::ZipError),
    /// Feed spreadsheet could not be read
    Spreadsheet(calamine::XlsError),
    /// Feed content does not have the expected shape
    Feed(String),
    /// Price string could not be converted to minor units
    Price(String),
    /// Required environment variable is not set
    MissingEnv(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Network(e) => write!(f, "Network error: {}", e),
            SyncError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            SyncError::Parse(e) => write!(f, "Parse error: {}", e),
            SyncError::Io(e) => write!(f, "I/O error: {}", e),
            SyncError::Zip(e) => write!(f, "Feed archive error: {}", e),
            SyncError::Spreadsheet(e) => write!(f, "Feed spreadsheet error: {}", e),
            SyncError::Feed(msg) => write!(f, "Feed error: {}", msg),
            SyncError::Price(raw) => write!(f, "Invalid price value: {:?}", raw),
            SyncError::MissingEnv(name) => {
                write!(f, "Required environment variable not set: {}", name)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Network(e) => Some(e),
            SyncError::Parse(e) => Some(e),
            SyncError::Io(e) => Some(e),
            SyncError::Zip(e) => Some(e),
            SyncError::Spreadsheet(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Parse(err)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err)
    }
}

impl From<zip::result::ZipError> for SyncError {
    fn from(err: zip::result::ZipError) -> Self {
        SyncError::Zip(err)
    }
}

impl From<calamine::XlsError> for SyncError {
    fn from(err: calamine::XlsError) -> Self {
        SyncError::Spreadsheet(err)
    }
}

/// Result alias for watch_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
