//! The Data Exchange client.

use tracing::{instrument, warn};

use relatics_dx_auth::Authentication;
use relatics_dx_soap::{
    Envelope, ParameterInjector, SoapClient, XmlElement, RELATICS_NAMESPACE,
};

use crate::error::{Error, ErrorKind, Result};
use crate::export::ExportResult;
use crate::import::ImportResult;
use crate::payload::{build_payload, ImportData, ImportOptions};

/// SOAP action of the "providing data" operation.
const GET_RESULT_ACTION: &str = "http://www.relatics.com/GetResult";
/// SOAP action of the "receiving data" operation.
const IMPORT_ACTION: &str = "http://www.relatics.com/Import";

/// Client for the Data Exchange webservice of one Relatics workspace.
///
/// ## Example
///
/// ```rust,ignore
/// use relatics_dx_exchange::{Authentication, DataExchangeClient, ImportData, ImportOptions};
///
/// let client = DataExchangeClient::new("acme", "00000000-0000-0000-0000-000000000000")?
///     .with_user_agent("asset-sync/2.1");
///
/// let result = client
///     .get_result("GetProjectData", &[], &Authentication::from("entry-code"))
///     .await?;
/// if result.is_ok() {
///     println!("{:?}", result.data());
/// }
///
/// let rows = vec![vec![
///     ("name".to_string(), "Object 1".to_string()),
///     ("description".to_string(), "Lorem ipsum dolor sit amet.".to_string()),
/// ]];
/// let import = client
///     .run_import(
///         "ImportObjects",
///         &ImportData::Rows(rows),
///         &ImportOptions::new(),
///         &Authentication::None,
///     )
///     .await?;
/// println!("rows imported: {:?}", import.total_rows());
/// ```
#[derive(Debug, Clone)]
pub struct DataExchangeClient {
    hostname: String,
    endpoint_url: String,
    workspace_id: String,
    keep_archive: bool,
    soap_client: SoapClient,
}

impl DataExchangeClient {
    /// Create a client for `{company_subdomain}.relaticsonline.com`.
    ///
    /// The workspace id is the GUID of the target workspace. A non-GUID
    /// value is accepted with a warning; the workspace then needs an
    /// overridden URL in Relatics.
    pub fn new(company_subdomain: &str, workspace_id: impl Into<String>) -> Result<Self> {
        if company_subdomain.is_empty() {
            return Err(Error::new(ErrorKind::Validation(
                "the company subdomain can not be empty".to_string(),
            )));
        }
        let workspace_id = workspace_id.into();
        if workspace_id.is_empty() {
            return Err(Error::new(ErrorKind::Validation(
                "the workspace id can not be empty".to_string(),
            )));
        }
        if uuid::Uuid::parse_str(&workspace_id).is_err() {
            warn!(
                workspace_id,
                "the supplied workspace id is not a GUID; make sure the workspace has an overridden URL in Relatics"
            );
        }

        let hostname = format!("{}.relaticsonline.com", company_subdomain.to_lowercase());
        let endpoint_url = format!("https://{hostname}/DataExchange.asmx");
        Ok(Self {
            hostname,
            endpoint_url,
            workspace_id,
            keep_archive: false,
            soap_client: SoapClient::new(),
        })
    }

    /// Set the user agent sent with every request. Shows up in the Relatics
    /// webservice log, so a distinctive value helps tracing calls back to
    /// an application.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.soap_client = self.soap_client.with_user_agent(user_agent);
        self
    }

    /// Keep the temporary import archive on disk. Debugging aid.
    pub fn with_keep_archive(mut self, keep_archive: bool) -> Self {
        self.keep_archive = keep_archive;
        self
    }

    /// Point the client at a different endpoint URL. The hostname used for
    /// token requests is unaffected. Intended for tests.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    /// Use a custom SOAP transport.
    pub fn with_soap_client(mut self, soap_client: SoapClient) -> Self {
        self.soap_client = soap_client;
        self
    }

    /// The hostname requests go to.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The target workspace id.
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Retrieve results from a "providing data" operation.
    ///
    /// `parameters` are free-form name/value pairs forwarded to the
    /// operation, in the given order. Service-level failures (invalid
    /// operation name, invalid workspace, ...) come back as
    /// [`ExportResult`] data with `has_error` set; `Err` is reserved for
    /// validation, transport and token failures.
    #[instrument(skip(self, parameters, authentication))]
    pub async fn get_result(
        &self,
        operation_name: &str,
        parameters: &[(String, String)],
        authentication: &Authentication,
    ) -> Result<ExportResult> {
        check_operation_name(operation_name)?;
        let (auth_block, bearer_token) = self.resolve_authentication(authentication).await?;

        let mut envelope = Envelope::new("GetResult", RELATICS_NAMESPACE)
            .with_field(XmlElement::with_text("Operation", operation_name))
            .with_field(self.identification())
            .with_field(auth_block);

        // The declarative fields above cannot express the attribute-bearing
        // parameter list; it goes in through the pre-send hook.
        if !parameters.is_empty() {
            envelope.apply(&ParameterInjector::new(parameters.iter().cloned()));
        }

        let response = self
            .soap_client
            .call(
                &self.endpoint_url,
                GET_RESULT_ACTION,
                &envelope,
                bearer_token.as_deref(),
            )
            .await?;

        Ok(ExportResult::from_response(response))
    }

    /// Send data to a "receiving data" (import) operation.
    ///
    /// `data` is either a list of rows or the path of a tabular file; see
    /// [`ImportData`]. Attached documents and the reported filename go in
    /// through [`ImportOptions`]. Service-level failures come back as
    /// [`ImportResult`] data with `has_error` set.
    #[instrument(skip(self, data, options, authentication))]
    pub async fn run_import(
        &self,
        operation_name: &str,
        data: &ImportData,
        options: &ImportOptions,
        authentication: &Authentication,
    ) -> Result<ImportResult> {
        check_operation_name(operation_name)?;
        let payload = build_payload(data, options, self.keep_archive)?;
        let (auth_block, bearer_token) = self.resolve_authentication(authentication).await?;

        let envelope = Envelope::new("Import", RELATICS_NAMESPACE)
            .with_field(XmlElement::with_text("Operation", operation_name))
            .with_field(self.identification())
            .with_field(auth_block)
            .with_field(XmlElement::with_text("Filename", &payload.filename))
            .with_field(XmlElement::with_text("Data", &payload.data_base64));

        let response = self
            .soap_client
            .call(
                &self.endpoint_url,
                IMPORT_ACTION,
                &envelope,
                bearer_token.as_deref(),
            )
            .await?;

        Ok(ImportResult::from_response(response))
    }

    fn identification(&self) -> XmlElement {
        XmlElement::new("Identification")
            .with_child(XmlElement::with_text("Workspace", &self.workspace_id))
    }

    /// The envelope `Authentication` block and bearer token for one call.
    ///
    /// The block is always present: the service rejects requests without
    /// one. It stays empty except for entry-code mode; client credentials
    /// ride the HTTP header only.
    async fn resolve_authentication(
        &self,
        authentication: &Authentication,
    ) -> Result<(XmlElement, Option<String>)> {
        let block = match authentication {
            Authentication::EntryCode(code) => XmlElement::new("Authentication")
                .with_child(XmlElement::with_text("Entrycode", code)),
            Authentication::None | Authentication::ClientCredential(_) => {
                XmlElement::new("Authentication")
            }
        };

        let bearer_token = match authentication {
            Authentication::ClientCredential(credential) => {
                Some(credential.get_token(&self.hostname, false).await?)
            }
            _ => None,
        };

        Ok((block, bearer_token))
    }
}

fn check_operation_name(operation_name: &str) -> Result<()> {
    if operation_name.is_empty() {
        return Err(Error::new(ErrorKind::Validation(
            "supplied operation name is empty".to_string(),
        )));
    }
    Ok(())
}
