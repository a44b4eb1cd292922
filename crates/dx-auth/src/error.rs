//! Error types for relatics-dx-auth.
//!
//! Error messages are designed to avoid exposing credential data; raw
//! response bodies are kept on the error for diagnostic logging.

/// Result type alias for relatics-dx-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relatics-dx-auth operations.
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
    /// The service rejected the credential exchange. Known errors include
    /// `invalid_client` ("Client not found."): unknown client id, incorrect
    /// secret, or a client id disabled in Relatics.
    #[error("Token request failed: {error} ({description})")]
    TokenRequest {
        error: String,
        description: String,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The HTTP exchange succeeded but no token came back.
    #[error("Token request failed: no access_token was given")]
    MalformedTokenResponse {
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// HTTP error during the token exchange.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The token response was not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Sanitize the message to avoid exposing URLs carrying tokens
        let message = err.to_string();
        let sanitized = if message.contains("access_token") || message.contains("token=") {
            "HTTP request failed (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http(sanitized), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_display() {
        let err = ErrorKind::TokenRequest {
            error: "invalid_client".to_string(),
            description: "Client not found.".to_string(),
            body: "{\"error\":\"invalid_client\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Token request failed: invalid_client (Client not found.)"
        );
    }

    #[test]
    fn test_malformed_response_display_hides_body() {
        let err = ErrorKind::MalformedTokenResponse {
            body: "{\"expires_in\":600}".to_string(),
        };
        assert_eq!(err.to_string(), "Token request failed: no access_token was given");
    }
}
