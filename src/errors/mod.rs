use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid account name: {0}")]
    InvalidAccount(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} returned for {url}")]
    HttpStatus { status: u16, url: String },

    // Parsing errors
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    // Output errors
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackupError {
    /// Transport-level failures that an image download may shrug off.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BackupError::Http(_) | BackupError::HttpStatus { .. })
    }
}

pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_recoverable() {
        let err = BackupError::HttpStatus {
            status: 404,
            url: "http://example.com/a".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "HTTP 404 returned for http://example.com/a");
    }

    #[test]
    fn test_io_errors_are_fatal() {
        let err = BackupError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!err.is_recoverable());
        assert!(!BackupError::MalformedFeed("no posts".to_string()).is_recoverable());
    }
}
