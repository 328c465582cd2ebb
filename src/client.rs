//! 보고서 서버 파사드: 관리/실행 두 SOAP 엔드포인트와 실행 세션을 관리합니다.
//!
//! [`SsrsClient`]는 엔드포인트마다 [`SoapTransport`] 하나를 생성 시점에 받아 보관하며,
//! 각 메서드는 요청 빌드 → 전송 → 응답 파싱을 한 번씩 수행합니다.
//!
//! ## 통신 플로우
//!
//! 1. [`list_children`](SsrsClient::list_children): 카탈로그 탐색 (관리 엔드포인트)
//! 2. [`load_report`](SsrsClient::load_report): 실행 세션 생성, `ExecutionID` 획득
//! 3. [`set_session_id`](SsrsClient::set_session_id): 이후 실행 호출에 `ExecutionHeader` 첨부
//! 4. [`set_execution_parameters`](SsrsClient::set_execution_parameters): 파라미터 설정
//! 5. [`render`](SsrsClient::render): 지정 포맷으로 렌더링

use tracing::debug;

use crate::codec::{
    Endpoint, SoapRequest, build_get_execution_info_request, build_get_item_definition_request,
    build_get_properties_request, build_get_render_resource_request,
    build_list_children_request, build_list_rendering_extensions_request,
    build_load_report_request, build_render_request, build_render_stream_request,
    build_set_execution_parameters_request, build_sort_request, build_toggle_item_request,
    operations, parse_execution_info_response, parse_extensions_response,
    parse_item_definition_response, parse_list_children_response, parse_properties_response,
    parse_render_resource_response, parse_render_response, parse_render_stream_response,
    parse_sort_response, parse_toggle_item_response,
};
use crate::config::SsrsConfig;
use crate::constants::DEFAULT_PARAMETER_LANGUAGE;
use crate::device_info::{DeviceInfo, Placeholders, render_device_info};
use crate::error::{Result, SsrsError};
use crate::transport::SoapTransport;
use crate::types::{
    CatalogItems, ExecutionInfo, ExecutionParameters, Extensions, ItemDefinition,
    PaginationMode, Properties, RenderOutput, RenderStream, SortDirection, SortResult,
};

/// SSRS SOAP 클라이언트
///
/// 실행 세션 ID는 빈 문자열이면 "미설정"으로 취급합니다.
/// 세션 상태는 `&mut self`로만 변경되므로 여러 태스크에서 공유하려면 외부 동기화가 필요합니다.
///
/// # 예시
///
/// ```no_run
/// use ssrs::client::SsrsClient;
/// use ssrs::{DeviceInfo, ExecutionParameters, PaginationMode};
///
/// # async fn example() -> ssrs::Result<()> {
/// let mut client = SsrsClient::new("https://reports.example.com/ReportServer", "user", "pw")?;
/// let info = client.load_report("/Sales/Monthly", None).await?;
/// client.set_session_id(info.execution_id());
///
/// let params = ExecutionParameters::from_pairs([("Year", vec!["2024", "2025"])]);
/// client.set_execution_parameters(&params).await?;
///
/// let output = client
///     .render("PDF", &DeviceInfo::new(), PaginationMode::Estimate)
///     .await?;
/// println!("{} bytes", output.len());
/// # Ok(())
/// # }
/// ```
pub struct SsrsClient {
    /// 보고서 서버 기본 URI (끝 슬래시 제거됨)
    base_uri: String,
    /// 사용자명
    username: String,
    /// 관리 엔드포인트 전송
    service: Box<dyn SoapTransport>,
    /// 실행 엔드포인트 전송
    execution: Box<dyn SoapTransport>,
    /// 실행 세션 ID (빈 문자열 = 미설정)
    session_id: String,
}

impl SsrsClient {
    /// 기본 URI와 자격 증명으로 HTTP 클라이언트를 생성합니다.
    ///
    /// - `base_uri`: 보고서 서버 기본 URI (예: `"https://host/ReportServer"`)
    /// - `username`, `password`: HTTP 자격 증명
    ///
    /// # 에러
    ///
    /// - [`SsrsError::Config`]: `base_uri`가 비어 있음
    /// - [`SsrsError::Http`]: reqwest 클라이언트 생성 실패
    #[cfg(feature = "client")]
    pub fn new(base_uri: &str, username: &str, password: &str) -> Result<Self> {
        Self::from_config(SsrsConfig::new(base_uri, username, password))
    }

    /// 설정으로 HTTP 클라이언트를 생성합니다. 두 엔드포인트 전송이 같은 자격 증명을 공유합니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::Config`]: 설정 검증 실패
    /// - [`SsrsError::Http`]: reqwest 클라이언트 생성 실패
    #[cfg(feature = "client")]
    pub fn from_config(config: SsrsConfig) -> Result<Self> {
        use crate::transport::HttpSoapTransport;

        config.validate()?;
        let service = HttpSoapTransport::new(config.service_url(), &config)?;
        let execution = HttpSoapTransport::new(config.execution_url(), &config)?;
        Ok(Self::with_transports(&config, service, execution))
    }

    /// 임의의 전송 구현으로 클라이언트를 생성합니다.
    ///
    /// `config`에서는 `base_uri`와 `username`만 사용합니다.
    pub fn with_transports(
        config: &SsrsConfig,
        service: impl SoapTransport + 'static,
        execution: impl SoapTransport + 'static,
    ) -> Self {
        Self {
            base_uri: config.base_uri.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            service: Box::new(service),
            execution: Box::new(execution),
            session_id: String::new(),
        }
    }

    /// 보고서 서버 기본 URI
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// 사용자명
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 현재 실행 세션 ID. 미설정이면 `None`.
    pub fn session_id(&self) -> Option<&str> {
        if self.session_id.is_empty() {
            None
        } else {
            Some(&self.session_id)
        }
    }

    /// 실행 세션 ID를 설정합니다.
    ///
    /// 이후 모든 실행 엔드포인트 호출에 `ExecutionHeader`가 첨부됩니다.
    /// 빈 문자열은 세션 해제와 같습니다.
    pub fn set_session_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.session_id = id.into();
        debug!(session_id = %self.session_id, "execution session set");
        self
    }

    /// 세션 ID가 설정되어 있는지 확인합니다.
    pub fn has_valid_session_id(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// 세션 ID가 없으면 [`SsrsError::SessionNotSet`]을 반환합니다.
    pub fn check_session_id(&self) -> Result<()> {
        if self.has_valid_session_id() {
            Ok(())
        } else {
            Err(SsrsError::SessionNotSet)
        }
    }

    /// 엔드포인트에 맞는 전송으로 요청을 보냅니다.
    async fn dispatch(&self, request: &SoapRequest) -> Result<String> {
        debug!(
            operation = request.operation,
            endpoint = ?request.endpoint,
            "dispatching SOAP call"
        );
        match request.endpoint {
            Endpoint::Service => self.service.call(request).await,
            Endpoint::Execution => self.execution.call(request).await,
        }
    }

    /// 장치 정보 옵션을 `<DeviceInfo>` 조각으로 렌더링합니다.
    /// `_SID_`는 현재 세션 ID, `_TIME_`은 현재 유닉스 시각으로 치환됩니다.
    fn device_info_xml(&self, options: &DeviceInfo) -> String {
        let placeholders = Placeholders {
            session_id: Some(&self.session_id),
            timestamp: Some(chrono::Utc::now().timestamp()),
        };
        render_device_info(options, &placeholders)
    }

    // -----------------------------------------------------------------
    // 관리 엔드포인트
    // -----------------------------------------------------------------

    /// 지정 경로의 자식 항목 목록을 조회합니다.
    ///
    /// # 에러
    ///
    /// - 전송 계층 에러 및 [`SsrsError::SoapFault`]
    /// - 응답 파싱 에러 ([`SsrsError::Xml`], [`SsrsError::MissingElement`])
    pub async fn list_children(&self, item_path: &str, recursive: bool) -> Result<CatalogItems> {
        let request = build_list_children_request(item_path, recursive);
        let body = self.dispatch(&request).await?;
        let items = parse_list_children_response(&body)?;
        debug!(item_path, recursive, count = items.len(), "listed children");
        Ok(items)
    }

    /// 항목 정의(RDL)를 조회합니다.
    pub async fn get_item_definition(&self, item_path: &str) -> Result<ItemDefinition> {
        let request = build_get_item_definition_request(item_path);
        let body = self.dispatch(&request).await?;
        parse_item_definition_response(&body)
    }

    /// 항목 속성을 조회합니다.
    pub async fn get_properties(&self, item_path: &str) -> Result<Properties> {
        let request = build_get_properties_request(item_path);
        let body = self.dispatch(&request).await?;
        parse_properties_response(&body)
    }

    // -----------------------------------------------------------------
    // 실행 엔드포인트
    // -----------------------------------------------------------------

    /// 현재 세션 ID를 요청 컨텍스트로 변환합니다.
    fn execution_id(&self) -> Option<&str> {
        self.session_id()
    }

    /// 보고서를 로드하여 새 실행 세션을 만듭니다.
    ///
    /// 반환된 [`ExecutionInfo::execution_id`]를 [`set_session_id`](Self::set_session_id)에 넘겨야
    /// 이후 호출이 같은 세션에서 실행됩니다.
    ///
    /// - `history_id`: 스냅샷 ID. `None`이면 `HistoryID` 요소를 생략합니다.
    pub async fn load_report(
        &self,
        report: &str,
        history_id: Option<&str>,
    ) -> Result<ExecutionInfo> {
        let request = build_load_report_request(report, history_id, self.execution_id());
        let body = self.dispatch(&request).await?;
        let info = parse_execution_info_response(&body, operations::LOAD_REPORT)?;
        debug!(report, execution_id = %info.execution_id, "report loaded");
        Ok(info)
    }

    /// 현재 실행 세션 정보를 조회합니다.
    pub async fn get_execution_info(&self) -> Result<ExecutionInfo> {
        let request = build_get_execution_info_request(self.execution_id());
        let body = self.dispatch(&request).await?;
        parse_execution_info_response(&body, operations::GET_EXECUTION_INFO)
    }

    /// 실행 파라미터를 기본 언어(`en-us`)로 설정합니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::SessionNotSet`]: 세션 ID 미설정 (네트워크 호출 없음)
    /// - 전송/파싱 에러
    pub async fn set_execution_parameters(
        &self,
        parameters: &ExecutionParameters,
    ) -> Result<ExecutionInfo> {
        self.set_execution_parameters_with_language(parameters, DEFAULT_PARAMETER_LANGUAGE)
            .await
    }

    /// 실행 파라미터를 지정한 언어로 설정합니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::SessionNotSet`]: 세션 ID 미설정 (네트워크 호출 없음)
    /// - 전송/파싱 에러
    pub async fn set_execution_parameters_with_language(
        &self,
        parameters: &ExecutionParameters,
        parameter_language: &str,
    ) -> Result<ExecutionInfo> {
        self.check_session_id()?;

        let request = build_set_execution_parameters_request(
            parameters,
            parameter_language,
            self.execution_id(),
        );
        let body = self.dispatch(&request).await?;
        let info = parse_execution_info_response(&body, operations::SET_EXECUTION_PARAMETERS)?;
        debug!(count = parameters.len(), parameter_language, "execution parameters set");
        Ok(info)
    }

    /// 보고서를 지정 포맷으로 렌더링합니다.
    ///
    /// - `format`: 렌더링 확장 이름 (예: `"PDF"`, `"HTML4.0"`, `"EXCELOPENXML"`)
    /// - `device_info`: 장치 정보 옵션 (`<DeviceInfo>`로 감싸짐)
    ///
    /// # 에러
    ///
    /// - [`SsrsError::SessionNotSet`]: 세션 ID 미설정 (네트워크 호출 없음)
    /// - 전송/파싱 에러, [`SsrsError::InvalidBase64`]
    pub async fn render(
        &self,
        format: &str,
        device_info: &DeviceInfo,
        pagination_mode: PaginationMode,
    ) -> Result<RenderOutput> {
        self.check_session_id()?;

        let device_info_xml = self.device_info_xml(device_info);
        let request = build_render_request(
            format,
            &device_info_xml,
            pagination_mode,
            self.execution_id(),
        );
        let body = self.dispatch(&request).await?;
        let output = parse_render_response(&body)?;
        debug!(format, bytes = output.len(), streams = output.stream_ids.len(), "rendered");
        Ok(output)
    }

    /// 렌더링 결과에 딸린 스트림(이미지 등)을 가져옵니다.
    ///
    /// 장치 정보 기본값 `Toolbar=false` 위에 호출자 옵션을 덮어씁니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::SessionNotSet`]: 세션 ID 미설정 (네트워크 호출 없음)
    /// - 전송/파싱 에러
    pub async fn render_stream(
        &self,
        format: &str,
        stream_id: &str,
        device_info: &DeviceInfo,
    ) -> Result<RenderStream> {
        self.check_session_id()?;

        let defaults = DeviceInfo::new().with("Toolbar", false);
        let device_info_xml = self.device_info_xml(&device_info.merged_over(&defaults));
        let request = build_render_stream_request(
            format,
            stream_id,
            &device_info_xml,
            self.execution_id(),
        );
        let body = self.dispatch(&request).await?;
        parse_render_stream_response(&body)
    }

    /// 렌더링 확장의 정적 리소스(툴바 이미지 등)를 가져옵니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::SessionNotSet`]: 세션 ID 미설정 (네트워크 호출 없음)
    /// - 전송/파싱 에러
    pub async fn get_render_resource(
        &self,
        format: &str,
        device_info: &DeviceInfo,
    ) -> Result<RenderStream> {
        self.check_session_id()?;

        let device_info_xml = self.device_info_xml(device_info);
        let request =
            build_get_render_resource_request(format, &device_info_xml, self.execution_id());
        let body = self.dispatch(&request).await?;
        parse_render_resource_response(&body)
    }

    /// 사용 가능한 렌더링 확장 목록을 조회합니다.
    pub async fn list_rendering_extensions(&self) -> Result<Extensions> {
        let request = build_list_rendering_extensions_request(self.execution_id());
        let body = self.dispatch(&request).await?;
        parse_extensions_response(&body)
    }

    /// 보고서 항목의 표시/숨김을 토글합니다. 항목을 찾았으면 `true`.
    pub async fn toggle_item(&self, toggle_id: &str) -> Result<bool> {
        let request = build_toggle_item_request(toggle_id, self.execution_id());
        let body = self.dispatch(&request).await?;
        parse_toggle_item_response(&body)
    }

    /// 대화형 정렬을 적용합니다.
    ///
    /// - `clear`: `true`이면 다른 정렬 항목의 정렬 상태를 해제
    pub async fn sort(
        &self,
        sort_item: &str,
        direction: SortDirection,
        clear: bool,
    ) -> Result<SortResult> {
        let request = build_sort_request(sort_item, direction, clear, self.execution_id());
        let body = self.dispatch(&request).await?;
        parse_sort_response(&body)
    }
}
