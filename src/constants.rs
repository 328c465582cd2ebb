//! SSRS SOAP 엔드포인트 경로, 네임스페이스, 기본값, 치환 토큰 등의 상수를 정의합니다.

/// 관리(카탈로그) 서비스 엔드포인트 상대 경로
pub const SERVICE_PATH: &str = "ReportService2010.asmx";

/// 실행(렌더링) 서비스 엔드포인트 상대 경로
pub const EXECUTION_PATH: &str = "ReportExecution2005.asmx";

/// 관리 서비스 XML 네임스페이스 (SOAPAction 접두어로도 사용)
pub const SERVICE_NAMESPACE: &str =
    "http://schemas.microsoft.com/sqlserver/reporting/2010/03/01/ReportServer";

/// 실행 서비스 XML 네임스페이스 (SOAPAction 접두어 및 ExecutionHeader 네임스페이스)
pub const EXECUTION_NAMESPACE: &str =
    "http://schemas.microsoft.com/sqlserver/2005/06/30/reporting/reportingservices";

/// SOAP 1.1 envelope 네임스페이스
pub const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 요청 Content-Type
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// HTTP 클라이언트 User-Agent 문자열
pub const USER_AGENT: &str = concat!("ssrs-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP 요청 기본 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// `SetExecutionParameters`의 기본 파라미터 언어
pub const DEFAULT_PARAMETER_LANGUAGE: &str = "en-us";

/// device info XML 조각의 루트 요소명
pub const DEVICE_INFO_ROOT: &str = "DeviceInfo";

/// device info 값에서 현재 세션 ID로 치환되는 토큰
pub const SESSION_ID_PLACEHOLDER: &str = "_SID_";

/// device info 값에서 현재 유닉스 시각(초)으로 치환되는 토큰
pub const TIME_PLACEHOLDER: &str = "_TIME_";

/// 환경 변수: 서버 기본 URI
pub const ENV_BASE_URI: &str = "SSRS_BASE_URI";

/// 환경 변수: 사용자명
pub const ENV_USERNAME: &str = "SSRS_USERNAME";

/// 환경 변수: 비밀번호
pub const ENV_PASSWORD: &str = "SSRS_PASSWORD";

/// 환경 변수: HTTP 타임아웃 (초)
pub const ENV_TIMEOUT_SECS: &str = "SSRS_TIMEOUT_SECS";
