//! Response shape classification.

use relatics_dx_soap::SoapValue;

/// The mutually-exclusive top-level shapes a Data Exchange response takes.
///
/// Classification happens once, here; the result constructors match on the
/// outcome instead of probing the raw tree field by field.
#[derive(Debug)]
pub(crate) enum ResponseBody {
    /// No usable payload came back.
    Empty,
    /// The service reported an error through the `Export` node.
    ServiceError {
        /// The node's `Error` attribute, or empty when the attribute itself
        /// is missing.
        message: String,
        raw: SoapValue,
    },
    /// A "providing data" reply (`Report` node present).
    Report(SoapValue),
    /// A "receiving data" reply (`Import` node present).
    Import(SoapValue),
    /// Anything else; kept whole for diagnostics.
    Other(SoapValue),
}

impl ResponseBody {
    pub(crate) fn classify(response: Option<SoapValue>) -> Self {
        let Some(raw) = response else {
            return ResponseBody::Empty;
        };

        if raw.has_child("Export") {
            let message = raw
                .child("Export")
                .and_then(|export| export.attr("Error"))
                .unwrap_or_default()
                .to_string();
            return ResponseBody::ServiceError { message, raw };
        }
        if raw.has_child("Report") {
            return ResponseBody::Report(raw);
        }
        if raw.has_child("Import") {
            return ResponseBody::Import(raw);
        }
        ResponseBody::Other(raw)
    }
}
