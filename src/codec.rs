//! 프로토콜 코덱 모듈: SSRS SOAP 요청 빌더 + 응답 파서
//!
//! SOAP 1.1 envelope을 빌드하고, 응답 envelope을 응답 객체로 파싱합니다.
//! 요청 요소명은 원격 인터페이스가 정한 고정 문자열이며 그대로 사용해야 합니다.
//!
//! ## 요청 빌더
//!
//! 관리 엔드포인트 ([`Endpoint::Service`]):
//! - [`build_list_children_request`]: `ListChildren{ItemPath, Recursive}`
//! - [`build_get_item_definition_request`]: `GetItemDefinition{ItemPath}`
//! - [`build_get_properties_request`]: `GetProperties{ItemPath}`
//!
//! 실행 엔드포인트 ([`Endpoint::Execution`]), 세션 ID가 있으면 `ExecutionHeader` 포함:
//! - [`build_load_report_request`]: `LoadReport{Report, HistoryID}`
//! - [`build_get_execution_info_request`]: `GetExecutionInfo2{}`
//! - [`build_set_execution_parameters_request`]: `SetExecutionParameters{Parameters, ParameterLanguage}`
//! - [`build_render_request`]: `Render2{Format, DeviceInfo, PaginationMode}`
//! - [`build_render_stream_request`]: `RenderStream{Format, StreamID, DeviceInfo}`
//! - [`build_get_render_resource_request`]: `GetRenderResource{Format, DeviceInfo}`
//! - [`build_list_rendering_extensions_request`]: `ListRenderingExtensions{}`
//! - [`build_toggle_item_request`]: `ToggleItem{ToggleID}`
//! - [`build_sort_request`]: `Sort{SortItem, Direction, Clear}`
//!
//! ## 응답 파서
//!
//! - [`parse_response`]: envelope 해제 + SOAP fault 감지
//! - [`check_fault`] / [`check_fault_result`]: fault 감지
//! - `parse_*_response`: 연산별 응답 객체 생성

use crate::constants::{
    EXECUTION_NAMESPACE, EXECUTION_PATH, SERVICE_NAMESPACE, SERVICE_PATH, SOAP_ENVELOPE_NAMESPACE,
};
use crate::error::{Result, SsrsError};
use crate::field::{
    FromXml, read_base64, read_bool, read_i32, read_string_list, read_text,
};
use crate::types::{
    CatalogItem, CatalogItems, ExecutionInfo, ExecutionParameters, Extension, Extensions,
    ItemDefinition, PaginationMode, Properties, Property, RenderOutput, RenderStream,
    RenderWarning, SortDirection, SortResult,
};
use crate::wire::{XmlNode, XmlWriter, parse_document};

/// 원격 연산 이름 상수
pub mod operations {
    /// 폴더 하위 항목 목록
    pub const LIST_CHILDREN: &str = "ListChildren";
    /// 항목 정의(RDL) 조회
    pub const GET_ITEM_DEFINITION: &str = "GetItemDefinition";
    /// 항목 속성 조회
    pub const GET_PROPERTIES: &str = "GetProperties";
    /// 렌더링 확장 목록
    pub const LIST_RENDERING_EXTENSIONS: &str = "ListRenderingExtensions";
    /// 보고서 로드 (실행 세션 생성)
    pub const LOAD_REPORT: &str = "LoadReport";
    /// 현재 실행 정보 조회
    pub const GET_EXECUTION_INFO: &str = "GetExecutionInfo2";
    /// 실행 파라미터 설정
    pub const SET_EXECUTION_PARAMETERS: &str = "SetExecutionParameters";
    /// 렌더링
    pub const RENDER: &str = "Render2";
    /// 보조 스트림 렌더링
    pub const RENDER_STREAM: &str = "RenderStream";
    /// 렌더링 리소스 조회
    pub const GET_RENDER_RESOURCE: &str = "GetRenderResource";
    /// 토글 항목 전환
    pub const TOGGLE_ITEM: &str = "ToggleItem";
    /// 대화형 정렬
    pub const SORT: &str = "Sort";
}

/// SSRS SOAP 엔드포인트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// 관리 서비스 (`ReportService2010.asmx`)
    Service,
    /// 실행 서비스 (`ReportExecution2005.asmx`)
    Execution,
}

impl Endpoint {
    /// 엔드포인트 XML 네임스페이스
    pub fn namespace(&self) -> &'static str {
        match self {
            Endpoint::Service => SERVICE_NAMESPACE,
            Endpoint::Execution => EXECUTION_NAMESPACE,
        }
    }

    /// 기본 상대 경로
    pub fn default_path(&self) -> &'static str {
        match self {
            Endpoint::Service => SERVICE_PATH,
            Endpoint::Execution => EXECUTION_PATH,
        }
    }
}

/// 전송 계층에 넘겨지는 SOAP 요청 한 건
///
/// 실행 세션 ID는 호출 단위 컨텍스트로 요청에 실려 다니며,
/// 전송 객체는 세션 상태를 갖지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// 대상 엔드포인트
    pub endpoint: Endpoint,
    /// 연산 이름 (예: `"ListChildren"`)
    pub operation: &'static str,
    /// `SOAPAction` 헤더 값 (`<namespace>/<operation>`)
    pub action: String,
    /// envelope에 `ExecutionHeader`로 실린 세션 ID
    pub execution_id: Option<String>,
    /// 직렬화된 envelope
    pub envelope: String,
}

/// `ExecutionHeader` SOAP 헤더 조각을 빌드합니다.
///
/// ```
/// use ssrs::codec::build_execution_header;
///
/// let header = build_execution_header("abc");
/// assert!(header.starts_with("<ExecutionHeader xmlns="));
/// assert!(header.ends_with("<ExecutionID>abc</ExecutionID></ExecutionHeader>"));
/// ```
pub fn build_execution_header(execution_id: &str) -> String {
    let mut w = XmlWriter::new();
    w.open_ns("ExecutionHeader", EXECUTION_NAMESPACE);
    w.element("ExecutionID", execution_id);
    w.close("ExecutionHeader");
    w.into_string()
}

/// 공통 envelope을 씁니다.
///
/// 형식:
/// ```text
/// <?xml …?>
/// <soap:Envelope …>
///   [<soap:Header><ExecutionHeader …/></soap:Header>]   // 실행 엔드포인트 + 세션 ID
///   <soap:Body><{operation} xmlns="{namespace}">…</{operation}></soap:Body>
/// </soap:Envelope>
/// ```
fn build_request<F>(
    endpoint: Endpoint,
    operation: &'static str,
    execution_id: Option<&str>,
    write_body: F,
) -> SoapRequest
where
    F: FnOnce(&mut XmlWriter),
{
    // NOTE: The service endpoint never carries the execution header
    let execution_id = match endpoint {
        Endpoint::Execution => execution_id.filter(|id| !id.is_empty()),
        Endpoint::Service => None,
    };

    let mut w = XmlWriter::new();
    w.declaration();
    w.raw(&format!(
        concat!(
            r#"<soap:Envelope xmlns:soap="{}""#,
            r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
            r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#
        ),
        SOAP_ENVELOPE_NAMESPACE
    ));
    if let Some(id) = execution_id {
        w.open("soap:Header");
        w.raw(&build_execution_header(id));
        w.close("soap:Header");
    }
    w.open("soap:Body");
    w.open_ns(operation, endpoint.namespace());
    write_body(&mut w);
    w.close(operation);
    w.close("soap:Body");
    w.close("soap:Envelope");

    SoapRequest {
        endpoint,
        operation,
        action: format!("{}/{}", endpoint.namespace(), operation),
        execution_id: execution_id.map(str::to_string),
        envelope: w.into_string(),
    }
}

/// `ListChildren` 요청을 빌드합니다.
///
/// ```
/// use ssrs::codec::build_list_children_request;
///
/// let req = build_list_children_request("/Reports", true);
/// assert!(req.envelope.contains("<ItemPath>/Reports</ItemPath><Recursive>true</Recursive>"));
/// ```
pub fn build_list_children_request(item_path: &str, recursive: bool) -> SoapRequest {
    build_request(Endpoint::Service, operations::LIST_CHILDREN, None, |w| {
        w.element("ItemPath", item_path);
        w.bool_element("Recursive", recursive);
    })
}

/// `GetItemDefinition` 요청을 빌드합니다.
pub fn build_get_item_definition_request(item_path: &str) -> SoapRequest {
    build_request(Endpoint::Service, operations::GET_ITEM_DEFINITION, None, |w| {
        w.element("ItemPath", item_path);
    })
}

/// `GetProperties` 요청을 빌드합니다. 속성 필터 없이 모든 속성을 요청합니다.
pub fn build_get_properties_request(item_path: &str) -> SoapRequest {
    build_request(Endpoint::Service, operations::GET_PROPERTIES, None, |w| {
        w.element("ItemPath", item_path);
    })
}

/// `LoadReport` 요청을 빌드합니다. `history_id`가 없으면 요소를 생략합니다.
pub fn build_load_report_request(
    report: &str,
    history_id: Option<&str>,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::LOAD_REPORT,
        execution_id,
        |w| {
            w.element("Report", report);
            w.element_opt("HistoryID", history_id);
        },
    )
}

/// `GetExecutionInfo2` 요청을 빌드합니다.
pub fn build_get_execution_info_request(execution_id: Option<&str>) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::GET_EXECUTION_INFO,
        execution_id,
        |_| {},
    )
}

/// `SetExecutionParameters` 요청을 빌드합니다.
///
/// 각 파라미터는 `<ParameterValue><Name/><Value/></ParameterValue>`로 직렬화됩니다.
pub fn build_set_execution_parameters_request(
    parameters: &ExecutionParameters,
    parameter_language: &str,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::SET_EXECUTION_PARAMETERS,
        execution_id,
        |w| {
            w.open("Parameters");
            for (name, value) in parameters.to_soap_pairs() {
                w.open("ParameterValue");
                w.element("Name", name);
                w.element("Value", value);
                w.close("ParameterValue");
            }
            w.close("Parameters");
            w.element("ParameterLanguage", parameter_language);
        },
    )
}

/// `Render2` 요청을 빌드합니다.
///
/// `device_info_xml`은 이미 렌더링된 `<DeviceInfo>` 조각이며 문자열 값으로 이스케이프되어 실립니다.
pub fn build_render_request(
    format: &str,
    device_info_xml: &str,
    pagination_mode: PaginationMode,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(Endpoint::Execution, operations::RENDER, execution_id, |w| {
        w.element("Format", format);
        w.element("DeviceInfo", device_info_xml);
        w.element("PaginationMode", pagination_mode.as_str());
    })
}

/// `RenderStream` 요청을 빌드합니다.
pub fn build_render_stream_request(
    format: &str,
    stream_id: &str,
    device_info_xml: &str,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::RENDER_STREAM,
        execution_id,
        |w| {
            w.element("Format", format);
            w.element("StreamID", stream_id);
            w.element("DeviceInfo", device_info_xml);
        },
    )
}

/// `GetRenderResource` 요청을 빌드합니다.
pub fn build_get_render_resource_request(
    format: &str,
    device_info_xml: &str,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::GET_RENDER_RESOURCE,
        execution_id,
        |w| {
            w.element("Format", format);
            w.element("DeviceInfo", device_info_xml);
        },
    )
}

/// `ListRenderingExtensions` 요청을 빌드합니다.
pub fn build_list_rendering_extensions_request(execution_id: Option<&str>) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::LIST_RENDERING_EXTENSIONS,
        execution_id,
        |_| {},
    )
}

/// `ToggleItem` 요청을 빌드합니다.
pub fn build_toggle_item_request(toggle_id: &str, execution_id: Option<&str>) -> SoapRequest {
    build_request(
        Endpoint::Execution,
        operations::TOGGLE_ITEM,
        execution_id,
        |w| {
            w.element("ToggleID", toggle_id);
        },
    )
}

/// `Sort` 요청을 빌드합니다.
pub fn build_sort_request(
    sort_item: &str,
    direction: SortDirection,
    clear: bool,
    execution_id: Option<&str>,
) -> SoapRequest {
    build_request(Endpoint::Execution, operations::SORT, execution_id, |w| {
        w.element("SortItem", sort_item);
        w.element("Direction", direction.as_str());
        w.bool_element("Clear", clear);
    })
}

fn fault_of(body: &XmlNode) -> Option<(String, String)> {
    let fault = body.child("Fault")?;
    // NOTE: SSRS puts its own error code (e.g. rsItemNotFound) under <detail>
    let code = fault
        .find("ErrorCode")
        .map(|n| n.text.clone())
        .filter(|c| !c.is_empty())
        .or_else(|| read_text(fault, "faultcode"))
        .unwrap_or_default();
    let message = read_text(fault, "faultstring").unwrap_or_default();
    Some((code, message))
}

/// 응답 본문에서 SOAP fault를 감지합니다.
///
/// fault가 있으면 `Some((코드, 메시지))`, 없거나 XML로 해석할 수 없으면 `None`을 반환합니다.
/// 코드는 `<detail><ErrorCode>`가 있으면 그 값, 없으면 `faultcode`입니다.
///
/// 구조화된 에러가 필요하면 [`check_fault_result`]를 사용하세요.
pub fn check_fault(xml: &str) -> Option<(String, String)> {
    let root = parse_document(xml).ok()?;
    let body = root.child("Body")?;
    fault_of(body)
}

/// 응답 본문에서 SOAP fault를 감지하고 [`SsrsError::SoapFault`]로 반환합니다.
pub fn check_fault_result(xml: &str) -> Result<()> {
    match check_fault(xml) {
        Some((code, message)) => Err(SsrsError::SoapFault { code, message }),
        None => Ok(()),
    }
}

/// 응답 envelope을 해제하여 `<{operation}Response>` 요소를 반환합니다.
///
/// 다른 연산의 응답이 실려 오면 [`SsrsError::MissingElement`]입니다.
///
/// # 에러
///
/// - [`SsrsError::Xml`]: XML 문법 오류
/// - [`SsrsError::MissingElement`]: Body 또는 응답 요소 없음
/// - [`SsrsError::SoapFault`]: Body에 fault 포함
pub fn parse_response(xml: &str, operation: &str) -> Result<XmlNode> {
    let root = parse_document(xml)?;
    let root_name = root.name.clone();
    let body = root
        .children
        .into_iter()
        .find(|c| c.name == "Body")
        .ok_or_else(|| SsrsError::MissingElement {
            element: "Body".to_string(),
            context: root_name,
        })?;

    if let Some((code, message)) = fault_of(&body) {
        return Err(SsrsError::SoapFault { code, message });
    }

    let expected = format!("{operation}Response");
    body.children
        .into_iter()
        .find(|c| c.name == expected)
        .ok_or(SsrsError::MissingElement {
            element: expected,
            context: "Body".to_string(),
        })
}

/// `ListChildren` 응답을 파싱합니다. 단일 `CatalogItem`도 원소 하나짜리 컨테이너가 됩니다.
pub fn parse_list_children_response(xml: &str) -> Result<CatalogItems> {
    let response = parse_response(xml, operations::LIST_CHILDREN)?;
    let items = response.many("CatalogItems", "CatalogItem", CatalogItem::from_xml)?;
    Ok(CatalogItems::new(items))
}

/// `GetItemDefinition` 응답을 파싱합니다.
pub fn parse_item_definition_response(xml: &str) -> Result<ItemDefinition> {
    let response = parse_response(xml, operations::GET_ITEM_DEFINITION)?;
    Ok(ItemDefinition {
        definition: read_base64(&response, "Definition")?,
    })
}

/// `GetProperties` 응답을 파싱합니다.
pub fn parse_properties_response(xml: &str) -> Result<Properties> {
    let response = parse_response(xml, operations::GET_PROPERTIES)?;
    let properties = response.many("Values", "Property", Property::from_xml)?;
    Ok(Properties::new(properties))
}

/// `LoadReport` / `GetExecutionInfo2` / `SetExecutionParameters` 응답의
/// `executionInfo` 요소를 파싱합니다.
pub fn parse_execution_info_response(xml: &str, operation: &str) -> Result<ExecutionInfo> {
    let response = parse_response(xml, operation)?;
    let info = response
        .find("executionInfo")
        .or_else(|| response.find("ExecutionInfo"))
        .ok_or_else(|| SsrsError::MissingElement {
            element: "executionInfo".to_string(),
            context: response.name.clone(),
        })?;
    ExecutionInfo::from_xml(info)
}

/// `ListRenderingExtensions` 응답을 파싱합니다.
pub fn parse_extensions_response(xml: &str) -> Result<Extensions> {
    let response = parse_response(xml, operations::LIST_RENDERING_EXTENSIONS)?;
    let extensions = response.many("Extensions", "Extension", Extension::from_xml)?;
    Ok(Extensions::new(extensions))
}

/// `Render2` 응답을 파싱합니다.
pub fn parse_render_response(xml: &str) -> Result<RenderOutput> {
    let response = parse_response(xml, operations::RENDER)?;
    Ok(RenderOutput {
        result: read_base64(&response, "Result")?,
        extension: read_text(&response, "Extension"),
        mime_type: read_text(&response, "MimeType"),
        encoding: read_text(&response, "Encoding"),
        warnings: response.many("Warnings", "Warning", RenderWarning::from_xml)?,
        stream_ids: read_string_list(&response, "StreamIds", "string")?,
    })
}

/// `RenderStream` 응답을 파싱합니다.
pub fn parse_render_stream_response(xml: &str) -> Result<RenderStream> {
    let response = parse_response(xml, operations::RENDER_STREAM)?;
    Ok(RenderStream {
        result: read_base64(&response, "Result")?,
        encoding: read_text(&response, "Encoding"),
        mime_type: read_text(&response, "MimeType"),
    })
}

/// `GetRenderResource` 응답을 파싱합니다.
pub fn parse_render_resource_response(xml: &str) -> Result<RenderStream> {
    let response = parse_response(xml, operations::GET_RENDER_RESOURCE)?;
    Ok(RenderStream {
        result: read_base64(&response, "Result")?,
        encoding: None,
        mime_type: read_text(&response, "MimeType"),
    })
}

/// `ToggleItem` 응답을 파싱합니다. 토글 항목을 찾았으면 `true`.
pub fn parse_toggle_item_response(xml: &str) -> Result<bool> {
    let response = parse_response(xml, operations::TOGGLE_ITEM)?;
    read_bool(&response, "Found")
}

/// `Sort` 응답을 파싱합니다.
pub fn parse_sort_response(xml: &str) -> Result<SortResult> {
    let response = parse_response(xml, operations::SORT)?;
    Ok(SortResult {
        page_number: read_i32(&response, "PageNumber")?.unwrap_or_default(),
        report_item: read_text(&response, "ReportItem"),
        num_pages: read_i32(&response, "NumPages")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>{body}</soap:Body></soap:Envelope>"#
        )
    }

    #[test]
    fn test_list_children_request_fields() {
        let req = build_list_children_request("/Reports", true);
        assert_eq!(req.endpoint, Endpoint::Service);
        assert_eq!(req.operation, "ListChildren");
        assert_eq!(req.action, format!("{SERVICE_NAMESPACE}/ListChildren"));
        assert!(req.execution_id.is_none());
        assert!(req.envelope.contains(&format!(
            "<ListChildren xmlns=\"{SERVICE_NAMESPACE}\"><ItemPath>/Reports</ItemPath><Recursive>true</Recursive></ListChildren>"
        )));
        assert!(!req.envelope.contains("soap:Header"));
    }

    #[test]
    fn test_envelope_declares_soap_namespace() {
        let req = build_get_execution_info_request(None);
        assert!(req.envelope.contains(&format!(
            r#"<soap:Envelope xmlns:soap="{SOAP_ENVELOPE_NAMESPACE}""#
        )));
    }

    #[test]
    fn test_service_request_ignores_execution_header() {
        let req = build_request(Endpoint::Service, operations::GET_PROPERTIES, Some("sid"), |_| {});
        assert!(req.execution_id.is_none());
        assert!(!req.envelope.contains("ExecutionHeader"));
    }

    #[test]
    fn test_execution_header_attached_when_session_set() {
        let req = build_get_execution_info_request(Some("sess-1"));
        assert_eq!(req.execution_id.as_deref(), Some("sess-1"));
        assert!(req.envelope.contains(&format!(
            "<soap:Header><ExecutionHeader xmlns=\"{EXECUTION_NAMESPACE}\"><ExecutionID>sess-1</ExecutionID></ExecutionHeader></soap:Header>"
        )));
    }

    #[test]
    fn test_execution_header_omitted_for_empty_session() {
        let req = build_load_report_request("/Sales/Monthly", None, Some(""));
        assert!(req.execution_id.is_none());
        assert!(!req.envelope.contains("soap:Header"));
    }

    #[test]
    fn test_load_report_request_history_id() {
        let without = build_load_report_request("/R", None, None);
        assert!(!without.envelope.contains("HistoryID"));
        let with = build_load_report_request("/R", Some("2024-01-01T00:00:00"), None);
        assert!(with.envelope.contains("<HistoryID>2024-01-01T00:00:00</HistoryID>"));
        assert_eq!(with.action, format!("{EXECUTION_NAMESPACE}/LoadReport"));
    }

    #[test]
    fn test_set_execution_parameters_request_body() {
        let params = ExecutionParameters::from_pairs([("Region", vec!["EU", "US"])]);
        let req = build_set_execution_parameters_request(&params, "en-us", Some("s"));
        assert!(req.envelope.contains(
            "<Parameters><ParameterValue><Name>Region</Name><Value>EU</Value></ParameterValue>\
             <ParameterValue><Name>Region</Name><Value>US</Value></ParameterValue></Parameters>\
             <ParameterLanguage>en-us</ParameterLanguage>"
        ));
    }

    #[test]
    fn test_render_request_escapes_device_info() {
        let req = build_render_request(
            "PDF",
            "<DeviceInfo><Toolbar>false</Toolbar></DeviceInfo>",
            PaginationMode::Estimate,
            Some("s"),
        );
        assert_eq!(req.operation, "Render2");
        assert!(req.envelope.contains(
            "<Format>PDF</Format><DeviceInfo>&lt;DeviceInfo&gt;&lt;Toolbar&gt;false&lt;/Toolbar&gt;&lt;/DeviceInfo&gt;</DeviceInfo><PaginationMode>Estimate</PaginationMode>"
        ));
    }

    #[test]
    fn test_sort_request_body() {
        let req = build_sort_request("tb1", SortDirection::Descending, true, Some("s"));
        assert!(req.envelope.contains(
            "<SortItem>tb1</SortItem><Direction>Descending</Direction><Clear>true</Clear>"
        ));
    }

    #[test]
    fn test_request_envelope_is_well_formed() {
        let req = build_render_stream_request("HTML4.0", "img1", "<DeviceInfo/>", Some("s&1"));
        let root = parse_document(&req.envelope).unwrap();
        assert_eq!(root.name, "Envelope");
        let header = root.child("Header").unwrap();
        assert_eq!(
            header.find("ExecutionID").map(|n| n.text.as_str()),
            Some("s&1")
        );
        let op = root.child("Body").unwrap().child("RenderStream").unwrap();
        assert_eq!(op.child_text("StreamID"), Some("img1"));
        assert_eq!(op.child_text("DeviceInfo"), Some("<DeviceInfo/>"));
    }

    #[test]
    fn test_parse_response_picks_named_element() {
        let xml = envelope(r#"<ToggleItemResponse xmlns="urn:x"><Found>true</Found></ToggleItemResponse>"#);
        let node = parse_response(&xml, "ToggleItem").unwrap();
        assert_eq!(node.name, "ToggleItemResponse");
        assert!(parse_toggle_item_response(&xml).unwrap());
    }

    #[test]
    fn test_parse_response_missing_body() {
        let err = parse_response("<Envelope/>", "X").unwrap_err();
        assert!(matches!(err, SsrsError::MissingElement { ref element, .. } if element == "Body"));
    }

    #[test]
    fn test_parse_response_empty_body() {
        let err = parse_response(&envelope(""), "ListChildren").unwrap_err();
        assert!(
            matches!(err, SsrsError::MissingElement { ref element, .. } if element == "ListChildrenResponse")
        );
    }

    #[test]
    fn test_parse_response_rejects_other_operation() {
        let xml = envelope(
            "<GetPropertiesResponse><Values><Property><Name>Hidden</Name></Property></Values></GetPropertiesResponse>",
        );
        let err = parse_list_children_response(&xml).unwrap_err();
        assert!(
            matches!(err, SsrsError::MissingElement { ref element, .. } if element == "ListChildrenResponse")
        );
    }

    #[test]
    fn test_fault_with_ssrs_error_code() {
        let xml = envelope(
            r#"<soap:Fault><faultcode>soap:Client</faultcode>
               <faultstring>The item '/Missing' cannot be found.</faultstring>
               <detail><ErrorCode xmlns="http://www.microsoft.com/sql/reportingservices">rsItemNotFound</ErrorCode></detail>
               </soap:Fault>"#,
        );
        assert_eq!(
            check_fault(&xml),
            Some((
                "rsItemNotFound".to_string(),
                "The item '/Missing' cannot be found.".to_string()
            ))
        );
        match parse_list_children_response(&xml) {
            Err(SsrsError::SoapFault { code, .. }) => assert_eq!(code, "rsItemNotFound"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_fault_without_detail_uses_faultcode() {
        let xml = envelope(
            "<soap:Fault><faultcode>soap:Server</faultcode><faultstring>boom</faultstring></soap:Fault>",
        );
        assert!(matches!(
            check_fault_result(&xml),
            Err(SsrsError::SoapFault { ref code, ref message }) if code == "soap:Server" && message == "boom"
        ));
    }

    #[test]
    fn test_check_fault_on_garbage_is_none() {
        assert_eq!(check_fault("Service Unavailable"), None);
        assert!(check_fault_result(&envelope("<OkResponse/>")).is_ok());
    }

    #[test]
    fn test_parse_list_children_single_item() {
        let xml = envelope(
            r#"<ListChildrenResponse xmlns="urn:x"><CatalogItems>
                <CatalogItem><Name>Only</Name><Path>/Only</Path><TypeName>Report</TypeName></CatalogItem>
               </CatalogItems></ListChildrenResponse>"#,
        );
        let items = parse_list_children_response(&xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.get(0).unwrap().path, "/Only");
    }

    #[test]
    fn test_parse_list_children_empty() {
        let xml = envelope(r#"<ListChildrenResponse xmlns="urn:x"><CatalogItems/></ListChildrenResponse>"#);
        assert!(parse_list_children_response(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_item_definition() {
        let xml = envelope(
            "<GetItemDefinitionResponse><Definition>PFJlcG9ydC8+</Definition></GetItemDefinitionResponse>",
        );
        let def = parse_item_definition_response(&xml).unwrap();
        assert_eq!(def.to_xml_string(), "<Report/>");
    }

    #[test]
    fn test_parse_properties() {
        let xml = envelope(
            "<GetPropertiesResponse><Values>\
             <Property><Name>Name</Name><Value>Monthly</Value></Property>\
             <Property><Name>Description</Name></Property>\
             </Values></GetPropertiesResponse>",
        );
        let props = parse_properties_response(&xml).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("Name"), Some("Monthly"));
        assert_eq!(props.get("Description"), None);
    }

    #[test]
    fn test_parse_execution_info_from_set_parameters() {
        let xml = envelope(
            "<SetExecutionParametersResponse><executionInfo>\
             <ExecutionID>e1</ExecutionID><NumPages>3</NumPages>\
             </executionInfo></SetExecutionParametersResponse>",
        );
        let info =
            parse_execution_info_response(&xml, operations::SET_EXECUTION_PARAMETERS).unwrap();
        assert_eq!(info.execution_id(), "e1");
        assert_eq!(info.num_pages, 3);
    }

    #[test]
    fn test_parse_execution_info_missing() {
        let xml = envelope("<LoadReportResponse/>");
        assert!(matches!(
            parse_execution_info_response(&xml, operations::LOAD_REPORT),
            Err(SsrsError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_parse_render_response() {
        let xml = envelope(
            "<Render2Response><Result>JVBERi0=</Result><Extension>pdf</Extension>\
             <MimeType>application/pdf</MimeType><Encoding/>\
             <Warnings><Warning><Code>rsW1</Code><Message>careful</Message></Warning></Warnings>\
             <StreamIds><string>s1</string><string>s2</string></StreamIds></Render2Response>",
        );
        let out = parse_render_response(&xml).unwrap();
        assert_eq!(out.bytes(), b"%PDF-");
        assert_eq!(out.extension.as_deref(), Some("pdf"));
        assert_eq!(out.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].code.as_deref(), Some("rsW1"));
        assert_eq!(out.stream_ids, vec!["s1", "s2"]);
    }

    #[test]
    fn test_parse_render_stream_and_resource() {
        let stream = envelope(
            "<RenderStreamResponse><Result>aW1n</Result><MimeType>image/png</MimeType></RenderStreamResponse>",
        );
        let out = parse_render_stream_response(&stream).unwrap();
        assert_eq!(out.bytes(), b"img");
        assert_eq!(out.mime_type.as_deref(), Some("image/png"));

        let resource = envelope(
            "<GetRenderResourceResponse><Result>Y3Nz</Result><MimeType>text/css</MimeType></GetRenderResourceResponse>",
        );
        let out = parse_render_resource_response(&resource).unwrap();
        assert_eq!(out.into_bytes(), b"css");
    }

    #[test]
    fn test_parse_extensions_response() {
        let xml = envelope(
            "<ListRenderingExtensionsResponse><Extensions>\
             <Extension><ExtensionType>Render</ExtensionType><Name>PDF</Name><Visible>true</Visible></Extension>\
             <Extension><ExtensionType>Render</ExtensionType><Name>CSV</Name><Visible>true</Visible></Extension>\
             </Extensions></ListRenderingExtensionsResponse>",
        );
        let exts = parse_extensions_response(&xml).unwrap();
        assert_eq!(exts.names(), vec!["PDF", "CSV"]);
    }

    #[test]
    fn test_parse_sort_response() {
        let xml = envelope(
            "<SortResponse><PageNumber>2</PageNumber><ReportItem>tb1</ReportItem></SortResponse>",
        );
        let sorted = parse_sort_response(&xml).unwrap();
        assert_eq!(sorted.page_number, 2);
        assert_eq!(sorted.report_item.as_deref(), Some("tb1"));
        assert_eq!(sorted.num_pages, None);
    }
}
