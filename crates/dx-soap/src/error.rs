//! Error types for relatics-dx-soap.

/// Result type alias for relatics-dx-soap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relatics-dx-soap operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP request failed. The message carries the response body for
    /// diagnostics.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// The service answered with a SOAP fault.
    #[error("SOAP fault: {code} - {message}")]
    SoapFault { code: String, message: String },

    /// The response was not shaped like a SOAP reply.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// XML could not be parsed or produced.
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::with_source(ErrorKind::Xml(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::SoapFault {
            code: "soap:Server".to_string(),
            message: "Server was unable to process request".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "SOAP fault: soap:Server - Server was unable to process request"
        );

        let err = ErrorKind::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: 500 Internal Server Error");

        let err = ErrorKind::Timeout;
        assert_eq!(err.to_string(), "Request timeout");
    }

    #[test]
    fn test_error_with_source() {
        let source_err = std::io::Error::other("connection reset");
        let err = Error::with_source(ErrorKind::Other("send failed".into()), source_err);

        assert!(err.source.is_some());
        assert_eq!(err.to_string(), "send failed");
    }
}
