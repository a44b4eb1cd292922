//! Error types for relatics-dx-exchange.

/// Result type alias for relatics-dx-exchange operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relatics-dx-exchange operations.
///
/// Service-reported failures (invalid operation name, invalid workspace,
/// import errors) are NOT errors of this type; they come back as data on
/// [`ExportResult`](crate::ExportResult) / [`ImportResult`](crate::ImportResult).
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
    /// Invalid caller input, detected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Data file extension outside the supported set.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File system error while packaging the payload.
    #[error("IO error: {0}")]
    Io(String),

    /// Archive could not be built or read.
    #[error("Archive error: {0}")]
    Zip(String),

    /// Transport-level failure of the SOAP call.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Token acquisition failed.
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl From<relatics_dx_soap::Error> for Error {
    fn from(err: relatics_dx_soap::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<relatics_dx_auth::Error> for Error {
    fn from(err: relatics_dx_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::with_source(ErrorKind::Zip(err.to_string()), err)
    }
}
