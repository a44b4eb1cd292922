//! End-to-end tests against a mock Data Exchange endpoint.
//!
//! A wiremock server stands in for `{company}.relaticsonline.com`, serving
//! both the SOAP endpoint and the OAuth2 token endpoint.

use std::io::Write as _;

use base64::{engine::general_purpose, Engine as _};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relatics_dx::auth::{Authentication, ClientCredential};
use relatics_dx::exchange::{
    DataExchangeClient, ElementAction, ImportData, ImportOptions, MessageStatus,
};

const WORKSPACE_ID: &str = "0a1b2c3d-4e5f-4071-8293-a4b5c6d7e8f9";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("relatics_dx=debug,relatics_dx_soap=debug")
        .try_init();
}

fn soap_body(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soap:Body>{inner}</soap:Body></soap:Envelope>"
    )
}

fn get_result_response(result: &str) -> String {
    soap_body(&format!(
        "<GetResultResponse xmlns=\"http://www.relatics.com/\">\
         <GetResultResult>{result}</GetResultResult></GetResultResponse>"
    ))
}

fn import_response(result: &str) -> String {
    soap_body(&format!(
        "<ImportResponse xmlns=\"http://www.relatics.com/\">\
         <ImportResult>{result}</ImportResult></ImportResponse>"
    ))
}

fn client_for(server: &MockServer) -> DataExchangeClient {
    DataExchangeClient::new("acme", WORKSPACE_ID)
        .unwrap()
        .with_user_agent("relatics-dx-tests/0.1")
        .with_endpoint_url(format!("{}/DataExchange.asmx", server.uri()))
}

fn documents_zip(entries: &[(&str, &[u8])]) -> String {
    let mut buffer = Vec::new();
    {
        let mut archive = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in entries {
            archive.start_file(*name, options).unwrap();
            archive.write_all(contents).unwrap();
        }
        archive.finish().unwrap();
    }
    general_purpose::STANDARD.encode(buffer)
}

#[tokio::test]
async fn get_result_round_trip_with_documents() {
    init_tracing();
    let server = MockServer::start().await;

    let encoded = documents_zip(&[("progress report.pdf", b"%PDF-1.7")]);
    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(header("soapaction", "\"http://www.relatics.com/GetResult\""))
        .and(body_string_contains("<Operation>GetProjectData</Operation>"))
        .and(body_string_contains(&format!(
            "<Identification><Workspace>{WORKSPACE_ID}</Workspace></Identification>"
        )))
        // No entry code and no credential: the block is present but empty.
        .and(body_string_contains("<Authentication/>"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            get_result_response(&format!(
                "<Report Name=\"ProjectData\">\
                 <Row name=\"Object 1\"/><Row name=\"Object 2\"/>\
                 <Documents>{encoded}</Documents></Report>"
            )),
            "text/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_result("GetProjectData", &[], &Authentication::None)
        .await
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(result.document("progress report.pdf"), Some(&b"%PDF-1.7"[..]));

    let report = result.data().unwrap().child("Report").unwrap();
    assert_eq!(report.children("Row").count(), 2);
    // The base64 blob is stripped once unpacked.
    assert!(!report.has_child("Documents"));
}

#[tokio::test]
async fn get_result_injects_parameters_in_order() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(body_string_contains(
            "<Parameters><Parameters>\
             <Parameter Name=\"from\" Value=\"2024-01-01\"/>\
             <Parameter Name=\"until\" Value=\"2024-02-01\"/>\
             </Parameters></Parameters>",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(get_result_response("<Report/>"), "text/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let parameters = vec![
        ("from".to_string(), "2024-01-01".to_string()),
        ("until".to_string(), "2024-02-01".to_string()),
    ];
    let result = client_for(&server)
        .get_result("GetProjectData", &parameters, &Authentication::None)
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn get_result_with_entry_code_rides_the_envelope() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(body_string_contains(
            "<Authentication><Entrycode>s3cret-code</Entrycode></Authentication>",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(get_result_response("<Report/>"), "text/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_result("GetProjectData", &[], &Authentication::from("s3cret-code"))
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn get_result_service_error_is_result_data() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            get_result_response("<Export Error=\"Invalid import webservice\"/>"),
            "text/xml",
        ))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_result("Bogus", &[], &Authentication::None)
        .await
        .unwrap();

    assert!(!result.is_ok());
    assert_eq!(result.error_msg(), Some("Invalid import webservice"));
}

#[tokio::test]
async fn run_import_walks_the_message_log() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(header("soapaction", "\"http://www.relatics.com/Import\""))
        .and(body_string_contains("<Filename>relatics_dx_import.xml</Filename>"))
        .and(body_string_contains("<Data>"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            import_response(
                "<Import>\
                 <Message Time=\"10:02:09\" Result=\"Comment\">Import started</Message>\
                 <Message Time=\"10:02:10\" Result=\"Progress\">Processing row : 1</Message>\
                 <Message Time=\"10:02:10\" Result=\"Success\">Row stored</Message>\
                 <Message Time=\"10:02:11\" Result=\"Progress\">Total rows imported: 10</Message>\
                 <Message Time=\"10:02:11\" Result=\"Progress\">Total time (ms): 4200</Message>\
                 <Elements>\
                 <Element Action=\"Add\" ID=\"e1\" ForeignKey=\"fk-1\"/>\
                 <Element Action=\"Update\" ID=\"e2\" ForeignKey=\"fk-2\"/>\
                 </Elements>\
                 </Import>",
            ),
            "text/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![vec![
        ("name".to_string(), "Object 1".to_string()),
        ("description".to_string(), "Lorem ipsum dolor sit amet.".to_string()),
    ]];
    let result = client_for(&server)
        .run_import(
            "ImportObjects",
            &ImportData::Rows(rows),
            &ImportOptions::new(),
            &Authentication::None,
        )
        .await
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(result.total_rows(), Some(10));
    assert_eq!(result.elapsed_time(), Some(std::time::Duration::from_millis(4200)));

    let rows_seen: Vec<u32> = result.messages().iter().map(|m| m.row).collect();
    assert_eq!(rows_seen, vec![0, 1, 1, 1, 1]);
    assert_eq!(result.messages()[0].status, MessageStatus::Comment);
    assert_eq!(result.progress_messages().len(), 3);

    assert_eq!(result.added_elements().len(), 1);
    assert_eq!(result.updated_elements().len(), 1);
    assert_eq!(result.elements()[0].action, ElementAction::Add);
    assert_eq!(result.elements()[0].foreign_key, "fk-1");
}

#[tokio::test]
async fn run_import_sends_row_data_as_base64_xml() {
    init_tracing();
    let server = MockServer::start().await;

    let expected_xml = "<Import><Row name=\"Object 1\"/></Import>";
    let expected_b64 = general_purpose::STANDARD.encode(expected_xml);

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(body_string_contains(&format!("<Data>{expected_b64}</Data>")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(import_response("<Import/>"), "text/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![vec![("name".to_string(), "Object 1".to_string())]];
    let result = client_for(&server)
        .run_import(
            "ImportObjects",
            &ImportData::Rows(rows),
            &ImportOptions::new(),
            &Authentication::None,
        )
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn client_credentials_fetch_a_token_and_send_it_as_bearer() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok_abc",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .and(header("authorization", "Bearer tok_abc"))
        // Client-credential mode keeps the envelope block empty.
        .and(body_string_contains("<Authentication/>"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(get_result_response("<Report/>"), "text/xml"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let credential = ClientCredential::new("client123", "secret456")
        .with_token_url(format!("{}/oauth2/token", server.uri()));
    let authentication = Authentication::from(credential);
    let client = client_for(&server);

    let first = client
        .get_result("GetProjectData", &[], &authentication)
        .await
        .unwrap();
    assert!(first.is_ok());

    // The second call reuses the cached token: the token mock expects
    // exactly one hit.
    let second = client
        .get_result("GetProjectData", &[], &authentication)
        .await
        .unwrap();
    assert!(second.is_ok());
}

#[tokio::test]
async fn empty_import_response_yields_an_undefined_error() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/DataExchange.asmx"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(import_response(""), "text/xml"),
        )
        .mount(&server)
        .await;

    let rows = vec![vec![("name".to_string(), "x".to_string())]];
    let result = client_for(&server)
        .run_import(
            "ImportObjects",
            &ImportData::Rows(rows),
            &ImportOptions::new(),
            &Authentication::None,
        )
        .await
        .unwrap();

    assert!(result.has_error());
    assert_eq!(result.error_msg(), Some(""));
}
