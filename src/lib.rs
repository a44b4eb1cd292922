//! # relatics-dx
//!
//! A Relatics Data Exchange webservice client library for Rust.
//!
//! Relatics exposes per-workspace "providing data" and "receiving data"
//! webservices over SOAP. This library marshals requests to both, under no
//! authentication, an entry code, or OAuth2 client credentials, and
//! interprets the loosely-typed responses into well-defined result types.
//!
//! ## Security
//!
//! - Sensitive data (client secrets, tokens) are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Caller-supplied values are escaped before envelope interpolation
//!
//! ## Crates
//!
//! - **relatics-dx-soap** - SOAP transport: envelopes, pre-send hooks,
//!   response trees, fault handling
//! - **relatics-dx-auth** - OAuth2 client-credential token management and
//!   the per-call authentication modes
//! - **relatics-dx-exchange** - the `GetResult`/`Import` operations with
//!   payload packaging and response interpretation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relatics_dx::auth::{Authentication, ClientCredential};
//! use relatics_dx::exchange::DataExchangeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = ClientCredential::new("client-id", "client-secret");
//!     let client = DataExchangeClient::new("acme", "00000000-0000-0000-0000-000000000000")?
//!         .with_user_agent("asset-sync/2.1");
//!
//!     let result = client
//!         .get_result("GetProjectData", &[], &Authentication::from(credential))
//!         .await?;
//!
//!     if result.is_ok() {
//!         println!("{:#?}", result.data());
//!     } else {
//!         eprintln!("service error: {:?}", result.error_msg());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use relatics_dx_auth as auth;
#[cfg(feature = "exchange")]
pub use relatics_dx_exchange as exchange;
#[cfg(feature = "soap")]
pub use relatics_dx_soap as soap;
