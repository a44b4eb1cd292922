//! Result of a "providing data" call.

use std::collections::HashMap;
use std::io::Read as _;

use base64::{engine::general_purpose, Engine as _};
use tracing::{info, warn};

use relatics_dx_soap::SoapValue;

use crate::error::{Error, ErrorKind, Result};
use crate::response::ResponseBody;

/// Interpreted result of a `get_result` call.
///
/// Service-reported failures are data, not `Err`: check [`is_ok`] (or
/// [`has_error`]) before using the payload. Known error strings include
/// `"Invalid import webservice"`, `"Invalid receiving webservice"` and
/// `"No active workspace found for the given identifier."`.
///
/// [`is_ok`]: ExportResult::is_ok
/// [`has_error`]: ExportResult::has_error
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    has_error: bool,
    error_msg: Option<String>,
    data: Option<SoapValue>,
    documents: HashMap<String, Vec<u8>>,
}

impl ExportResult {
    pub(crate) fn from_response(response: Option<SoapValue>) -> Self {
        match ResponseBody::classify(response) {
            ResponseBody::Empty => {
                warn!("empty response received from the export request; this indicates an undefined error");
                Self {
                    has_error: true,
                    error_msg: Some(String::new()),
                    ..Default::default()
                }
            }
            ResponseBody::ServiceError { message, raw } => {
                info!(error = %message, "received an error response from the export request");
                Self {
                    has_error: true,
                    error_msg: Some(message),
                    data: Some(raw),
                    documents: HashMap::new(),
                }
            }
            ResponseBody::Report(mut raw) => {
                let documents = extract_documents(&mut raw);
                Self {
                    has_error: false,
                    error_msg: None,
                    data: Some(raw),
                    documents,
                }
            }
            ResponseBody::Import(raw) | ResponseBody::Other(raw) => {
                warn!("unrecognized response received from the export request");
                Self {
                    has_error: true,
                    error_msg: Some(format!("{raw:?}")),
                    data: Some(raw),
                    documents: HashMap::new(),
                }
            }
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        !self.has_error
    }

    /// Whether the service reported an error, or the response was
    /// empty/unrecognized.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// The service's error message, when there is one. Empty for an
    /// undefined error; a diagnostic dump for an unrecognized response.
    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// The raw response payload, with the `Documents` node stripped once
    /// its contents have been unpacked into [`documents`](ExportResult::documents).
    pub fn data(&self) -> Option<&SoapValue> {
        self.data.as_ref()
    }

    /// Documents shipped with the report, keyed by filename.
    pub fn documents(&self) -> &HashMap<String, Vec<u8>> {
        &self.documents
    }

    /// One document's contents, when present.
    pub fn document(&self, filename: &str) -> Option<&[u8]> {
        self.documents.get(filename).map(Vec::as_slice)
    }
}

/// Pull the base64-zip `Report/Documents` node out of the response and
/// unpack it, keyed by archive entry name.
///
/// The node is removed from the carried data afterwards, so downstream
/// consumers are not presented with the full base64 blob.
fn extract_documents(response: &mut SoapValue) -> HashMap<String, Vec<u8>> {
    let encoded = match response
        .child_path(&["Report", "Documents"])
        .and_then(SoapValue::text)
    {
        Some(text) => text.to_string(),
        None => return HashMap::new(),
    };

    let documents = match unzip_documents(&encoded) {
        Ok(documents) => documents,
        Err(error) => {
            warn!(%error, "could not unpack the Documents node; leaving it in place");
            return HashMap::new();
        }
    };

    if let Some(report) = response.child_mut("Report") {
        report.remove_child("Documents");
    }
    documents
}

fn unzip_documents(encoded: &str) -> Result<HashMap<String, Vec<u8>>> {
    let bytes = general_purpose::STANDARD.decode(encoded.trim()).map_err(|e| {
        Error::new(ErrorKind::Zip(format!("Documents node is not valid base64: {e}")))
    })?;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut documents = HashMap::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;
        documents.insert(entry.name().to_string(), contents);
    }
    Ok(documents)
}
