//! HTTP 전송 테스트: wiremock 서버로 SOAP 1.1 요청 형식과 에러 매핑을 검증합니다.

#![cfg(feature = "client")]

use pretty_assertions::assert_eq;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ssrs::codec::build_list_children_request;
use ssrs::constants::{EXECUTION_NAMESPACE, SERVICE_NAMESPACE, SOAP_CONTENT_TYPE};
use ssrs::transport::{HttpSoapTransport, SoapTransport};
use ssrs::{DeviceInfo, PaginationMode, SsrsClient, SsrsConfig, SsrsError};

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>{body}</soap:Body></soap:Envelope>"#
    )
}

fn base_uri(server: &MockServer) -> String {
    format!("{}/ReportServer/", server.uri())
}

#[tokio::test]
async fn test_list_children_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ReportServer/ReportService2010.asmx"))
        .and(header("Content-Type", SOAP_CONTENT_TYPE))
        .and(header(
            "SOAPAction",
            format!("\"{SERVICE_NAMESPACE}/ListChildren\"").as_str(),
        ))
        .and(basic_auth("reporter", "s3cret"))
        .and(body_string_contains("<ItemPath>/Reports</ItemPath>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<ListChildrenResponse><CatalogItems><CatalogItem><Path>/Reports/A</Path></CatalogItem><CatalogItem><Path>/Reports/B</Path></CatalogItem></CatalogItems></ListChildrenResponse>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = SsrsClient::new(&base_uri(&server), "reporter", "s3cret").unwrap();
    let items = client.list_children("/Reports", true).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_execution_calls_hit_execution_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ReportServer/ReportExecution2005.asmx"))
        .and(header(
            "SOAPAction",
            format!("\"{EXECUTION_NAMESPACE}/Render2\"").as_str(),
        ))
        .and(body_string_contains("<ExecutionID>exec-9</ExecutionID>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<Render2Response><Result>aGVsbG8=</Result><MimeType>text/html</MimeType></Render2Response>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SsrsClient::new(&base_uri(&server), "reporter", "s3cret").unwrap();
    client.set_session_id("exec-9");
    let output = client
        .render("HTML4.0", &DeviceInfo::new(), PaginationMode::Estimate)
        .await
        .unwrap();
    assert_eq!(output.bytes(), b"hello");
}

#[tokio::test]
async fn test_http_500_with_fault_is_soap_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(envelope(
            "<soap:Fault><faultcode>soap:Server</faultcode><faultstring>Access denied</faultstring><detail><ErrorCode>rsAccessDenied</ErrorCode></detail></soap:Fault>",
        )))
        .mount(&server)
        .await;

    let config = SsrsConfig::new(&base_uri(&server), "", "");
    let transport = HttpSoapTransport::new(config.service_url(), &config).unwrap();
    let err = transport
        .call(&build_list_children_request("/", false))
        .await
        .unwrap_err();
    match err {
        SsrsError::SoapFault { code, message } => {
            assert_eq!(code, "rsAccessDenied");
            assert_eq!(message, "Access denied");
        }
        other => panic!("expected SoapFault, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_503_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = SsrsClient::new(&base_uri(&server), "reporter", "pw").unwrap();
    let err = client.list_children("/", false).await.unwrap_err();
    assert!(matches!(err, SsrsError::HttpStatus { status: 503 }));
}

#[tokio::test]
async fn test_no_authorization_header_without_username() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<ListChildrenResponse><CatalogItems/></ListChildrenResponse>",
        )))
        .mount(&server)
        .await;

    let config = SsrsConfig::new(&base_uri(&server), "", "");
    let transport = HttpSoapTransport::new(config.service_url(), &config).unwrap();
    transport
        .call(&build_list_children_request("/", false))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}
