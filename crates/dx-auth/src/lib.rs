//! # relatics-dx-auth
//!
//! Authentication for the Relatics Data Exchange webservice.
//!
//! The service accepts three modes per call: none, a static entry code, or
//! OAuth2 client credentials. This crate provides the closed
//! [`Authentication`] variant the operations take, and the
//! [`ClientCredential`] manager that fetches and caches bearer tokens per
//! hostname.
//!
//! ## Example
//!
//! ```rust,ignore
//! use relatics_dx_auth::{Authentication, ClientCredential};
//!
//! let credential = ClientCredential::new("my-client-id", "my-client-secret");
//! let authentication = Authentication::from(credential);
//!
//! // Entry code mode is just a string:
//! let authentication = Authentication::from("entry-code");
//! ```
//!
//! ## Security
//!
//! - `client_secret` and cached tokens are redacted in `Debug` output
//! - Tracing spans skip credential parameters
//! - Token request failures keep the raw response body for diagnostics
//!   without echoing credentials

mod auth;
mod credentials;
mod error;

pub use auth::Authentication;
pub use credentials::{ClientCredential, DEFAULT_USER_AGENT, TOKEN_PATH};
pub use error::{Error, ErrorKind, Result};
