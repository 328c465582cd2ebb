//! SSRS 요청 파라미터와 응답 객체의 공유 타입 정의입니다.
//!
//! - 요청 어댑터 [`ExecutionParameters`]: 키/값(또는 값 목록) 매핑을 원격 호출 형태로 변환
//! - 응답 어댑터 [`CatalogItems`], [`ReportParameters`], [`Properties`], [`Extensions`]:
//!   단일/배열 모호성이 정규화된 순서 있는 컨테이너
//! - 응답 값 객체: [`ExecutionInfo`], [`ItemDefinition`], [`RenderOutput`], [`RenderStream`] 등

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// 요청 파라미터
// ---------------------------------------------------------------------------

/// 보고서 파라미터 값 하나 (원격 `ParameterValue`의 Name/Value 쌍)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportParameterValue {
    /// 파라미터 이름
    pub name: String,
    /// 파라미터 값
    pub value: String,
}

impl ReportParameterValue {
    /// 새 파라미터 값을 생성합니다.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 사용자 입력 파라미터 값: 스칼라 하나 또는 다중 선택 값 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterInput {
    /// 항목 하나로 변환되는 스칼라 값
    Single(String),
    /// 원소마다 항목 하나로 변환되는 값 목록
    Multiple(Vec<String>),
}

impl ParameterInput {
    fn into_values(self) -> Vec<String> {
        match self {
            ParameterInput::Single(value) => vec![value],
            ParameterInput::Multiple(values) => values,
        }
    }
}

impl From<&str> for ParameterInput {
    fn from(value: &str) -> Self {
        ParameterInput::Single(value.to_string())
    }
}

impl From<String> for ParameterInput {
    fn from(value: String) -> Self {
        ParameterInput::Single(value)
    }
}

impl From<&String> for ParameterInput {
    fn from(value: &String) -> Self {
        ParameterInput::Single(value.clone())
    }
}

impl From<Vec<String>> for ParameterInput {
    fn from(values: Vec<String>) -> Self {
        ParameterInput::Multiple(values)
    }
}

impl From<Vec<&str>> for ParameterInput {
    fn from(values: Vec<&str>) -> Self {
        ParameterInput::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ParameterInput {
    fn from(values: &[&str]) -> Self {
        ParameterInput::Multiple(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParameterInput {
    fn from(values: [&str; N]) -> Self {
        ParameterInput::Multiple(values.iter().map(|v| v.to_string()).collect())
    }
}

/// `SetExecutionParameters`에 전달할 순서 있는 파라미터 목록
///
/// 스칼라 값은 항목 하나, 값 목록은 원소마다 같은 이름의 항목 하나로 펼쳐집니다.
/// 이름은 중복될 수 있습니다 (다중 선택 파라미터).
///
/// # 예시
///
/// ```
/// use ssrs::types::{ExecutionParameters, ParameterInput};
///
/// let params = ExecutionParameters::from_pairs([
///     ("Year", ParameterInput::from("2024")),
///     ("Region", ParameterInput::from(vec!["EU", "US"])),
/// ]);
/// assert_eq!(params.len(), 3);
/// assert_eq!(params.values_for("Region"), vec!["EU", "US"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionParameters {
    parameters: Vec<ReportParameterValue>,
}

impl ExecutionParameters {
    /// 빈 목록을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 키/입력 쌍으로부터 목록을 생성합니다. 순서는 반복 순서를 따릅니다.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterInput>,
    {
        let mut params = Self::new();
        params.set_parameters(pairs);
        params
    }

    /// 기존 항목을 모두 버리고 키/입력 쌍으로 다시 채웁니다.
    pub fn set_parameters<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterInput>,
    {
        self.parameters.clear();
        for (key, input) in pairs {
            self.add(key, input);
        }
    }

    /// 키 하나에 대한 입력을 펼쳐서 뒤에 추가합니다.
    pub fn add(&mut self, key: impl Into<String>, input: impl Into<ParameterInput>) {
        let key = key.into();
        for value in input.into().into_values() {
            self.parameters
                .push(ReportParameterValue::new(key.clone(), value));
        }
    }

    /// 이미 만들어진 파라미터 값을 그대로 추가합니다.
    pub fn push(&mut self, parameter: ReportParameterValue) {
        self.parameters.push(parameter);
    }

    /// 전체 항목
    pub fn parameters(&self) -> &[ReportParameterValue] {
        &self.parameters
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// 항목을 순서대로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, ReportParameterValue> {
        self.parameters.iter()
    }

    /// 이름이 `name`인 항목의 값들을 순서대로 반환합니다.
    pub fn values_for(&self, name: &str) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.value.as_str())
            .collect()
    }

    /// 원격 호출이 요구하는 `(Name, Value)` 쌍 목록으로 변환합니다.
    pub fn to_soap_pairs(&self) -> Vec<(&str, &str)> {
        self.parameters
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ExecutionParameters
where
    K: Into<String>,
    V: Into<ParameterInput>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl From<Vec<ReportParameterValue>> for ExecutionParameters {
    fn from(parameters: Vec<ReportParameterValue>) -> Self {
        Self { parameters }
    }
}

impl<'a> IntoIterator for &'a ExecutionParameters {
    type Item = &'a ReportParameterValue;
    type IntoIter = std::slice::Iter<'a, ReportParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// `Render2`의 페이지 수 계산 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PaginationMode {
    /// 추정 페이지 수 (기본값)
    #[default]
    Estimate,
    /// 실제 페이지 수
    Actual,
}

impl PaginationMode {
    /// 원격 인터페이스의 열거값 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            PaginationMode::Estimate => "Estimate",
            PaginationMode::Actual => "Actual",
        }
    }
}

/// `Sort`의 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortDirection {
    /// 정렬 해제
    None,
    /// 오름차순
    Ascending,
    /// 내림차순
    Descending,
}

impl SortDirection {
    /// 원격 인터페이스의 열거값 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::None => "None",
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

// ---------------------------------------------------------------------------
// 카탈로그
// ---------------------------------------------------------------------------

/// 보고서 서버 폴더/항목 계층의 항목 하나
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogItem {
    /// 항목 GUID
    pub id: String,
    /// 항목 이름
    pub name: String,
    /// 전체 경로 (예: `"/Sales/Monthly"`)
    pub path: String,
    /// 가상 경로 (내 보고서 등)
    pub virtual_path: Option<String>,
    /// 항목 타입명 (`"Folder"`, `"Report"`, `"DataSource"` 등)
    pub type_name: String,
    /// 바이트 크기
    pub size: Option<i64>,
    /// 설명
    pub description: Option<String>,
    /// 숨김 여부
    pub hidden: bool,
    /// 생성 시각
    pub creation_date: Option<DateTime<Utc>>,
    /// 수정 시각
    pub modified_date: Option<DateTime<Utc>>,
    /// 생성자
    pub created_by: Option<String>,
    /// 수정자
    pub modified_by: Option<String>,
    /// 리소스 MIME 타입
    pub mime_type: Option<String>,
    /// 만료 시각
    pub expires_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    /// 보고서 항목인지 확인합니다.
    pub fn is_report(&self) -> bool {
        self.type_name == "Report"
    }

    /// 폴더 항목인지 확인합니다.
    pub fn is_folder(&self) -> bool {
        self.type_name == "Folder"
    }
}

/// `ListChildren` 결과: 순서 있는 카탈로그 항목 컨테이너
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogItems {
    items: Vec<CatalogItem>,
}

impl CatalogItems {
    /// 항목 목록으로 컨테이너를 생성합니다.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// 전체 항목
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 인덱스로 항목을 가져옵니다.
    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// 항목을 순서대로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }

    /// 경로가 정확히 일치하는 항목을 찾습니다.
    pub fn find_by_path(&self, path: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.path == path)
    }

    /// 보고서 항목만 순회합니다.
    pub fn reports(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|item| item.is_report())
    }

    /// 컨테이너를 소비하여 `Vec`을 반환합니다.
    pub fn into_vec(self) -> Vec<CatalogItem> {
        self.items
    }
}

impl IntoIterator for CatalogItems {
    type Item = CatalogItem;
    type IntoIter = std::vec::IntoIter<CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a CatalogItems {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// `GetItemDefinition` 결과: 항목 정의(RDL 등) 원본 바이트
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDefinition {
    /// base64 디코딩된 정의 바이트
    pub definition: Vec<u8>,
}

impl ItemDefinition {
    /// 원본 바이트
    pub fn as_bytes(&self) -> &[u8] {
        &self.definition
    }

    /// 정의를 UTF-8 문자열로 반환합니다. BOM은 제거되며 잘못된 바이트는 대체됩니다.
    pub fn to_xml_string(&self) -> String {
        let bytes = self
            .definition
            .strip_prefix(&[0xEF, 0xBB, 0xBF])
            .unwrap_or(&self.definition);
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// 정의가 비어 있는지 확인합니다 (폴더 등 정의가 없는 항목).
    pub fn is_empty(&self) -> bool {
        self.definition.is_empty()
    }
}

/// 항목 속성 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// 속성 이름
    pub name: String,
    /// 속성 값 (nil 가능)
    pub value: Option<String>,
}

/// `GetProperties` 결과: 순서 있는 속성 컨테이너
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    properties: Vec<Property>,
}

impl Properties {
    /// 속성 목록으로 컨테이너를 생성합니다.
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// 전체 속성
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// 이름으로 속성 값을 찾습니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_deref())
    }

    /// 속성 수
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// 속성이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// 속성을 순서대로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }
}

// ---------------------------------------------------------------------------
// 렌더링 확장
// ---------------------------------------------------------------------------

/// 서버에 설치된 확장 하나 (렌더링 포맷)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// 확장 종류 (`"Render"` 등)
    pub extension_type: String,
    /// 확장 이름: `render`의 `format` 인자로 사용 (예: `"PDF"`)
    pub name: String,
    /// 지역화된 표시 이름
    pub localized_name: Option<String>,
    /// UI 노출 여부
    pub visible: bool,
    /// 모델 생성 지원 여부
    pub is_model_generation_supported: bool,
}

/// `ListRenderingExtensions` 결과: 순서 있는 확장 컨테이너
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extensions {
    extensions: Vec<Extension>,
}

impl Extensions {
    /// 확장 목록으로 컨테이너를 생성합니다.
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    /// 전체 확장
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// 확장 이름 목록
    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name.as_str()).collect()
    }

    /// 이름으로 확장을 찾습니다 (대소문자 무시).
    pub fn find(&self, name: &str) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// 확장 수
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// 확장이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// 확장을 순서대로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.extensions.iter()
    }
}

// ---------------------------------------------------------------------------
// 실행 정보
// ---------------------------------------------------------------------------

/// 파라미터의 유효 값 하나
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidValue {
    /// 표시 레이블
    pub label: Option<String>,
    /// 실제 값
    pub value: Option<String>,
}

/// 보고서 파라미터 정의 (원격 `ReportParameter`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportParameter {
    /// 파라미터 이름
    pub name: String,
    /// 데이터 타입 (`"String"`, `"DateTime"`, `"Integer"`, `"Float"`, `"Boolean"`)
    pub parameter_type: Option<String>,
    /// null 허용 여부
    pub nullable: bool,
    /// 빈 문자열 허용 여부
    pub allow_blank: bool,
    /// 다중 값 허용 여부
    pub multi_value: bool,
    /// 쿼리 파라미터 여부
    pub query_parameter: bool,
    /// 프롬프트 문구
    pub prompt: Option<String>,
    /// 사용자에게 프롬프트할지 여부
    pub prompt_user: bool,
    /// 이 파라미터가 의존하는 파라미터 이름들
    pub dependencies: Vec<String>,
    /// 유효 값이 쿼리 기반인지 여부
    pub valid_values_query_based: bool,
    /// 유효 값 목록
    pub valid_values: Vec<ValidValue>,
    /// 기본값이 쿼리 기반인지 여부
    pub default_values_query_based: bool,
    /// 기본값 목록
    pub default_values: Vec<String>,
    /// 파라미터 상태 (`"HasValidValue"`, `"MissingValidValue"` 등)
    pub state: Option<String>,
    /// 상태 관련 에러 메시지
    pub error_message: Option<String>,
}

/// 순서 있는 보고서 파라미터 정의 컨테이너
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportParameters {
    parameters: Vec<ReportParameter>,
}

impl ReportParameters {
    /// 파라미터 목록으로 컨테이너를 생성합니다.
    pub fn new(parameters: Vec<ReportParameter>) -> Self {
        Self { parameters }
    }

    /// 전체 파라미터
    pub fn parameters(&self) -> &[ReportParameter] {
        &self.parameters
    }

    /// 이름으로 파라미터를 찾습니다.
    pub fn get(&self, name: &str) -> Option<&ReportParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// 파라미터 수
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// 파라미터가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// 파라미터를 순서대로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, ReportParameter> {
        self.parameters.iter()
    }
}

/// `LoadReport` / `GetExecutionInfo2` / `SetExecutionParameters` 결과
///
/// [`execution_id`](Self::execution_id)를 [`SsrsClient::set_session_id`](crate::client::SsrsClient::set_session_id)에
/// 넘겨야 이후 세션 범위 작업을 호출할 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionInfo {
    /// 실행 세션 ID
    pub execution_id: String,
    /// 보고서 경로
    pub report_path: Option<String>,
    /// 히스토리 스냅샷 ID
    pub history_id: Option<String>,
    /// 스냅샷 보유 여부
    pub has_snapshot: bool,
    /// 처리 필요 여부
    pub needs_processing: bool,
    /// 쿼리 실행 허용 여부
    pub allow_query_execution: bool,
    /// 자격 증명 필요 여부
    pub credentials_required: bool,
    /// 파라미터 필요 여부
    pub parameters_required: bool,
    /// 문서 맵 보유 여부
    pub has_document_map: bool,
    /// 페이지 수
    pub num_pages: i32,
    /// 자동 새로고침 간격 (초)
    pub auto_refresh_interval: i32,
    /// 실행 시각
    pub execution_date_time: Option<DateTime<Utc>>,
    /// 세션 만료 시각
    pub expiration_date_time: Option<DateTime<Utc>>,
    /// 파라미터 정의
    pub parameters: ReportParameters,
}

impl ExecutionInfo {
    /// 실행 세션 ID
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// 파라미터 정의
    pub fn parameters(&self) -> &ReportParameters {
        &self.parameters
    }
}

// ---------------------------------------------------------------------------
// 렌더링 결과
// ---------------------------------------------------------------------------

/// 렌더링 경고 하나
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderWarning {
    /// 경고 코드
    pub code: Option<String>,
    /// 심각도
    pub severity: Option<String>,
    /// 대상 객체 이름
    pub object_name: Option<String>,
    /// 대상 객체 타입
    pub object_type: Option<String>,
    /// 경고 메시지
    pub message: Option<String>,
}

/// `Render2` 결과: 해석하지 않는 렌더링 바이트와 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    /// 렌더링된 바이트
    #[serde(skip)]
    pub result: Vec<u8>,
    /// 파일 확장자 (예: `"pdf"`)
    pub extension: Option<String>,
    /// MIME 타입
    pub mime_type: Option<String>,
    /// 텍스트 인코딩
    pub encoding: Option<String>,
    /// 렌더링 경고
    pub warnings: Vec<RenderWarning>,
    /// `RenderStream`으로 가져올 수 있는 스트림 ID (이미지 등)
    pub stream_ids: Vec<String>,
}

impl RenderOutput {
    /// 렌더링된 바이트
    pub fn bytes(&self) -> &[u8] {
        &self.result
    }

    /// 결과를 소비하여 바이트를 반환합니다.
    pub fn into_bytes(self) -> Vec<u8> {
        self.result
    }

    /// 렌더링된 바이트 수
    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// 결과가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// `RenderStream` / `GetRenderResource` 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderStream {
    /// 스트림 바이트
    #[serde(skip)]
    pub result: Vec<u8>,
    /// 텍스트 인코딩
    pub encoding: Option<String>,
    /// MIME 타입
    pub mime_type: Option<String>,
}

impl RenderStream {
    /// 스트림 바이트
    pub fn bytes(&self) -> &[u8] {
        &self.result
    }

    /// 결과를 소비하여 바이트를 반환합니다.
    pub fn into_bytes(self) -> Vec<u8> {
        self.result
    }
}

/// `Sort` 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortResult {
    /// 정렬 대상이 있는 페이지 번호
    pub page_number: i32,
    /// 정렬된 보고서 항목 ID
    pub report_item: Option<String>,
    /// 정렬 후 전체 페이지 수 (서버가 반환한 경우)
    pub num_pages: Option<i32>,
}
