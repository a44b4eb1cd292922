//! Per-call authentication modes.

use std::sync::Arc;

use crate::credentials::ClientCredential;

/// Authentication for a single webservice call.
///
/// A closed set instead of a "string or credential object" parameter: the
/// call sites that build the envelope block and the bearer header match on
/// it exhaustively.
#[derive(Debug, Clone, Default)]
pub enum Authentication {
    /// No authentication. The envelope still carries an empty
    /// `Authentication` block; the service rejects requests without one.
    #[default]
    None,
    /// Static shared-secret entry code, sent inside the envelope.
    EntryCode(String),
    /// OAuth2 client credentials, sent as an HTTP bearer header.
    ClientCredential(Arc<ClientCredential>),
}

impl Authentication {
    /// The credential manager, when this mode carries one.
    pub fn client_credential(&self) -> Option<&ClientCredential> {
        match self {
            Authentication::ClientCredential(credential) => Some(credential),
            _ => None,
        }
    }
}

impl From<&str> for Authentication {
    fn from(entry_code: &str) -> Self {
        Authentication::EntryCode(entry_code.to_string())
    }
}

impl From<String> for Authentication {
    fn from(entry_code: String) -> Self {
        Authentication::EntryCode(entry_code)
    }
}

impl From<ClientCredential> for Authentication {
    fn from(credential: ClientCredential) -> Self {
        Authentication::ClientCredential(Arc::new(credential))
    }
}

impl From<Arc<ClientCredential>> for Authentication {
    fn from(credential: Arc<ClientCredential>) -> Self {
        Authentication::ClientCredential(credential)
    }
}
