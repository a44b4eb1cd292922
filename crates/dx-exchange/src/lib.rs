//! # relatics-dx-exchange
//!
//! The two Data Exchange operations of a Relatics workspace:
//!
//! - **get_result** - retrieve structured data and attached documents from
//!   a "providing data" webservice
//! - **run_import** - submit tabular data and attached documents to a
//!   "receiving data" webservice
//!
//! Both run under one of three authentication modes (none, entry code,
//! OAuth2 client credentials) and interpret the loosely-typed service
//! response into [`ExportResult`] / [`ImportResult`]. Service-reported
//! failures are data on those results, not `Err`; callers check `is_ok()`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use relatics_dx_exchange::{Authentication, DataExchangeClient, ImportData, ImportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), relatics_dx_exchange::Error> {
//!     let client = DataExchangeClient::new("acme", "00000000-0000-0000-0000-000000000000")?;
//!
//!     let result = client
//!         .get_result(
//!             "GetProjectData",
//!             &[("from".to_string(), "2024-01-01".to_string())],
//!             &Authentication::from("entry-code"),
//!         )
//!         .await?;
//!
//!     for (filename, contents) in result.documents() {
//!         println!("{filename}: {} bytes", contents.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod export;
mod import;
mod payload;
mod response;

pub use client::DataExchangeClient;
pub use error::{Error, ErrorKind, Result};
pub use export::ExportResult;
pub use import::{ElementAction, ImportElement, ImportMessage, ImportResult, MessageStatus};
pub use payload::{
    ImportData, ImportOptions, ImportRow, DEFAULT_IMPORT_BASENAME, SUPPORTED_EXTENSIONS,
};

// Re-exported for convenient access; every operation takes these.
pub use relatics_dx_auth::{Authentication, ClientCredential};
pub use relatics_dx_soap::SoapValue;
