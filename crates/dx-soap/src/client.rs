//! HTTP transport for SOAP calls.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, instrument};

use crate::envelope::Envelope;
use crate::error::{Error, ErrorKind, Result};
use crate::value::{parse_document, SoapValue};

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// Default user agent advertised to the service. Shows up in the Relatics
/// webservice log.
pub const DEFAULT_USER_AGENT: &str = concat!("relatics-dx/", env!("CARGO_PKG_VERSION"));

/// Transport for Data Exchange SOAP operations.
///
/// One call is one request/response exchange; the transport imposes no
/// retries and no deadline of its own.
#[derive(Debug, Clone)]
pub struct SoapClient {
    http_client: reqwest::Client,
    user_agent: String,
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SoapClient {
    /// Create a new transport with the default user agent.
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the user agent sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// The configured user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn build_headers(&self, soap_action: &str, bearer_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml; charset=utf-8"),
        );
        // ASMX endpoints expect the action quoted.
        headers.insert(
            SOAP_ACTION_HEADER.clone(),
            HeaderValue::from_str(&format!("\"{soap_action}\""))
                .map_err(|e| Error::new(ErrorKind::Config(format!("invalid SOAP action: {e}"))))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| Error::new(ErrorKind::Config(format!("invalid user agent: {e}"))))?,
        );
        if let Some(token) = bearer_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                    Error::new(ErrorKind::Config(format!("invalid bearer token: {e}")))
                })?,
            );
        }
        Ok(headers)
    }

    /// Execute one SOAP call and return the operation result payload.
    ///
    /// Returns `Ok(None)` when the service answered without a result element
    /// or with an empty one; interpreting that is the caller's concern.
    /// SOAP faults and transport failures are errors.
    #[instrument(skip(self, envelope, bearer_token))]
    pub async fn call(
        &self,
        endpoint: &str,
        soap_action: &str,
        envelope: &Envelope,
        bearer_token: Option<&str>,
    ) -> Result<Option<SoapValue>> {
        let body = envelope.to_xml();
        debug!(request = %body, "sending SOAP request");

        let response = self
            .http_client
            .post(endpoint)
            .headers(self.build_headers(soap_action, bearer_token)?)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!(%status, response = %response_text, "received SOAP response");

        // Faults come back with a 500 status; check for them first so the
        // caller sees the fault instead of a bare HTTP error.
        if let Some((code, message)) = parse_fault(&response_text) {
            return Err(Error::new(ErrorKind::SoapFault { code, message }));
        }
        if !status.is_success() {
            return Err(Error::new(ErrorKind::Http {
                status: status.as_u16(),
                message: response_text,
            }));
        }

        extract_result(&response_text)
    }
}

/// Parse a SOAP fault from the response, if one is present.
fn parse_fault(xml: &str) -> Option<(String, String)> {
    if !xml.contains("faultcode") {
        return None;
    }

    let document = parse_document(xml).ok()?;
    let fault = document.child("Body")?.child("Fault")?;
    let code = fault
        .child("faultcode")
        .and_then(SoapValue::text)
        .unwrap_or_default()
        .to_string();
    let message = fault
        .child("faultstring")
        .and_then(SoapValue::text)
        .unwrap_or("Unknown error")
        .to_string();
    Some((code, message))
}

/// Descend `Envelope/Body/{operation}Response/{operation}Result` and hand
/// back the result content, if any.
fn extract_result(response_xml: &str) -> Result<Option<SoapValue>> {
    let document = parse_document(response_xml)?;
    let body = document
        .child("Body")
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing SOAP Body".to_string())))?;
    let wrapper = body
        .elements()
        .first()
        .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("empty SOAP Body".to_string())))?;

    let result = wrapper
        .elements()
        .iter()
        .find(|child| child.name().ends_with("Result"));

    Ok(result.filter(|node| !node.is_empty()).cloned())
}
