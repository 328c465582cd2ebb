//! SOAP 응답 필드 값 디코딩 모듈
//!
//! [`XmlNode`] 트리의 요소 텍스트를 XSD 타입에 맞는 Rust 값으로 변환하고,
//! 응답 객체마다 [`FromXml`]을 구현합니다.
//!
//! ## XSD 타입별 디코딩 규칙
//!
//! | XSD 타입 | Rust 타입 | 요소 없음 / nil |
//! |---|---|---|
//! | `xsd:string` | `Option<String>` | `None` |
//! | `xsd:boolean` | `bool` (`true`/`1`, `false`/`0`) | `false` |
//! | `xsd:int` | `Option<i32>` | `None` |
//! | `xsd:long` | `Option<i64>` | `None` |
//! | `xsd:dateTime` | `Option<DateTime<Utc>>` (오프셋 없으면 UTC로 간주) | `None` |
//! | `xsd:base64Binary` | `Vec<u8>` (공백 무시) | 빈 벡터 |
//!
//! 복수형 필드는 모두 [`XmlNode::many`]를 통해 단일/배열 정규화를 거칩니다.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Result, SsrsError};
use crate::types::{
    CatalogItem, ExecutionInfo, Extension, Property, ReportParameter, ReportParameters,
    RenderWarning, ValidValue,
};
use crate::wire::XmlNode;

/// [`XmlNode`]로부터 값을 디코딩할 수 있는 타입
pub trait FromXml: Sized {
    /// 노드 하나를 디코딩합니다.
    fn from_xml(node: &XmlNode) -> Result<Self>;
}

fn invalid(element: &str, value: &str) -> SsrsError {
    SsrsError::InvalidValue {
        element: element.to_string(),
        value: value.to_string(),
    }
}

/// `xsd:string` 자식 요소를 읽습니다.
pub fn read_text(node: &XmlNode, name: &str) -> Option<String> {
    node.child_text(name).map(str::to_string)
}

/// 필수 `xsd:string` 자식 요소를 읽습니다. nil이면 빈 문자열입니다.
///
/// # 에러
///
/// - [`SsrsError::MissingElement`]: 요소 없음
pub fn read_required_text(node: &XmlNode, name: &str) -> Result<String> {
    let child = node.require(name)?;
    Ok(if child.nil {
        String::new()
    } else {
        child.text.clone()
    })
}

/// `xsd:boolean` 자식 요소를 읽습니다. 요소가 없으면 `false`입니다.
///
/// # 에러
///
/// - [`SsrsError::InvalidValue`]: `true`/`false`/`1`/`0` 이외의 값
pub fn read_bool(node: &XmlNode, name: &str) -> Result<bool> {
    match node.child_text(name).map(str::trim) {
        None | Some("") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(invalid(name, other)),
    }
}

/// `xsd:int` 자식 요소를 읽습니다.
///
/// # 에러
///
/// - [`SsrsError::InvalidValue`]: 정수로 해석할 수 없는 값
pub fn read_i32(node: &XmlNode, name: &str) -> Result<Option<i32>> {
    match node.child_text(name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(|_| invalid(name, text)),
    }
}

/// `xsd:long` 자식 요소를 읽습니다.
///
/// # 에러
///
/// - [`SsrsError::InvalidValue`]: 정수로 해석할 수 없는 값
pub fn read_i64(node: &XmlNode, name: &str) -> Result<Option<i64>> {
    match node.child_text(name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(|_| invalid(name, text)),
    }
}

/// `xsd:dateTime` 문자열을 UTC 시각으로 변환합니다.
///
/// RFC 3339 형식을 우선 시도하고, 오프셋이 없는 값은 UTC로 간주합니다.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `xsd:dateTime` 자식 요소를 읽습니다.
///
/// # 에러
///
/// - [`SsrsError::InvalidValue`]: 시각으로 해석할 수 없는 값
pub fn read_datetime(node: &XmlNode, name: &str) -> Result<Option<DateTime<Utc>>> {
    match node.child_text(name) {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_datetime(text)
            .map(Some)
            .ok_or_else(|| invalid(name, text)),
    }
}

/// `xsd:base64Binary` 자식 요소를 디코딩합니다. 요소가 없으면 빈 벡터입니다.
///
/// # 에러
///
/// - [`SsrsError::InvalidBase64`]: base64 디코딩 실패
pub fn read_base64(node: &XmlNode, name: &str) -> Result<Vec<u8>> {
    match node.child_text(name) {
        None => Ok(Vec::new()),
        Some(text) => {
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            Ok(STANDARD.decode(compact)?)
        }
    }
}

/// 문자열 배열 필드(`<Container><item>…</item>…</Container>`)를 읽습니다.
pub fn read_string_list(node: &XmlNode, container: &str, item: &str) -> Result<Vec<String>> {
    node.many(container, item, |n| Ok(n.text.clone()))
}

impl FromXml for CatalogItem {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(CatalogItem {
            id: read_text(node, "ID").unwrap_or_default(),
            name: read_text(node, "Name").unwrap_or_default(),
            path: read_required_text(node, "Path")?,
            virtual_path: read_text(node, "VirtualPath"),
            type_name: read_text(node, "TypeName").unwrap_or_default(),
            size: read_i64(node, "Size")?,
            description: read_text(node, "Description"),
            hidden: read_bool(node, "Hidden")?,
            creation_date: read_datetime(node, "CreationDate")?,
            modified_date: read_datetime(node, "ModifiedDate")?,
            created_by: read_text(node, "CreatedBy"),
            modified_by: read_text(node, "ModifiedBy"),
            mime_type: read_text(node, "MimeType"),
            expires_at: read_datetime(node, "ExpiresAt")?,
        })
    }
}

impl FromXml for Property {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(Property {
            name: read_required_text(node, "Name")?,
            value: read_text(node, "Value"),
        })
    }
}

impl FromXml for Extension {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(Extension {
            extension_type: read_text(node, "ExtensionType").unwrap_or_default(),
            name: read_required_text(node, "Name")?,
            localized_name: read_text(node, "LocalizedName"),
            visible: read_bool(node, "Visible")?,
            is_model_generation_supported: read_bool(node, "IsModelGenerationSupported")?,
        })
    }
}

impl FromXml for ValidValue {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(ValidValue {
            label: read_text(node, "Label"),
            value: read_text(node, "Value"),
        })
    }
}

impl FromXml for ReportParameter {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(ReportParameter {
            name: read_required_text(node, "Name")?,
            parameter_type: read_text(node, "Type"),
            nullable: read_bool(node, "Nullable")?,
            allow_blank: read_bool(node, "AllowBlank")?,
            multi_value: read_bool(node, "MultiValue")?,
            query_parameter: read_bool(node, "QueryParameter")?,
            prompt: read_text(node, "Prompt"),
            prompt_user: read_bool(node, "PromptUser")?,
            dependencies: read_string_list(node, "Dependencies", "Dependency")?,
            valid_values_query_based: read_bool(node, "ValidValuesQueryBased")?,
            valid_values: node.many("ValidValues", "ValidValue", ValidValue::from_xml)?,
            default_values_query_based: read_bool(node, "DefaultValuesQueryBased")?,
            default_values: read_string_list(node, "DefaultValues", "Value")?,
            state: read_text(node, "State"),
            error_message: read_text(node, "ErrorMessage"),
        })
    }
}

impl FromXml for ExecutionInfo {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(ExecutionInfo {
            execution_id: read_required_text(node, "ExecutionID")?,
            report_path: read_text(node, "ReportPath"),
            history_id: read_text(node, "HistoryID").filter(|h| !h.is_empty()),
            has_snapshot: read_bool(node, "HasSnapshot")?,
            needs_processing: read_bool(node, "NeedsProcessing")?,
            allow_query_execution: read_bool(node, "AllowQueryExecution")?,
            credentials_required: read_bool(node, "CredentialsRequired")?,
            parameters_required: read_bool(node, "ParametersRequired")?,
            has_document_map: read_bool(node, "HasDocumentMap")?,
            num_pages: read_i32(node, "NumPages")?.unwrap_or_default(),
            auto_refresh_interval: read_i32(node, "AutoRefreshInterval")?.unwrap_or_default(),
            execution_date_time: read_datetime(node, "ExecutionDateTime")?,
            expiration_date_time: read_datetime(node, "ExpirationDateTime")?,
            parameters: ReportParameters::new(node.many(
                "Parameters",
                "ReportParameter",
                ReportParameter::from_xml,
            )?),
        })
    }
}

impl FromXml for RenderWarning {
    fn from_xml(node: &XmlNode) -> Result<Self> {
        Ok(RenderWarning {
            code: read_text(node, "Code"),
            severity: read_text(node, "Severity"),
            object_name: read_text(node, "ObjectName"),
            object_type: read_text(node, "ObjectType"),
            message: read_text(node, "Message"),
        })
    }
}
