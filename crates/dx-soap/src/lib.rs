//! # relatics-dx-soap
//!
//! SOAP transport for the Relatics Data Exchange webservice.
//!
//! ## Features
//!
//! - **Envelope assembly** - SOAP 1.1 envelopes built as a mutable element
//!   tree, so pre-send hooks can rework the document before it is serialized
//! - **Parameter injection** - attribute-bearing `Parameter` lists appended
//!   through an [`EnvelopeHook`], the one shape the declarative builder
//!   cannot express
//! - **Response trees** - responses parsed into a generic [`SoapValue`]
//!   hierarchy with absent-tolerant lookups
//! - **Fault handling** - SOAP faults surfaced as typed errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use relatics_dx_soap::{Envelope, SoapClient, XmlElement, RELATICS_NAMESPACE};
//!
//! let envelope = Envelope::new("GetResult", RELATICS_NAMESPACE)
//!     .with_field(XmlElement::with_text("Operation", "GetProjectData"));
//!
//! let client = SoapClient::new();
//! let response = client
//!     .call(
//!         "https://acme.relaticsonline.com/DataExchange.asmx",
//!         "http://www.relatics.com/GetResult",
//!         &envelope,
//!         None,
//!     )
//!     .await?;
//! ```

mod client;
mod envelope;
mod error;
mod value;
pub mod xml;

pub use client::{SoapClient, DEFAULT_USER_AGENT};
pub use envelope::{Envelope, EnvelopeHook, ParameterInjector, XmlElement};
pub use error::{Error, ErrorKind, Result};
pub use value::{parse_document, SoapValue};

/// XML namespace of the Data Exchange operations.
pub const RELATICS_NAMESPACE: &str = "http://www.relatics.com/";
