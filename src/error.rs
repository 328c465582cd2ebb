//! SSRS 클라이언트의 에러 타입 계층 구조를 정의합니다.
//!
//! 모든 에러는 [`SsrsError`] enum으로 표현되며, [`thiserror`]를 통해
//! `Display` 및 `Error` 트레이트가 자동 구현됩니다.
//!
//! 라이브러리 자체가 정의하는 실패는 [`SsrsError::SessionNotSet`] 하나뿐이며,
//! 나머지 변형은 전송 계층(HTTP)과 SOAP 응답 해석 과정에서 발생한 에러를
//! 가공 없이 호출자에게 전달하기 위한 것입니다.

/// SSRS 클라이언트의 최상위 에러 타입
///
/// 세션 선행 조건 위반, SOAP fault, XML/base64 해석 실패, 설정 에러,
/// HTTP/네트워크 에러를 모두 포괄합니다.
/// HTTP/네트워크 에러 변형은 feature `"client"` 활성화 시에만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum SsrsError {
    /// 실행 세션 ID가 설정되지 않은 상태에서 세션 범위 작업을 시도
    #[error("Session ID not set")]
    SessionNotSet,

    /// 서버가 반환한 SOAP fault
    #[error("SOAP fault ({code}): {message}")]
    SoapFault { code: String, message: String },

    /// XML 파싱 실패
    #[error("XML error: {0}")]
    Xml(String),

    /// 응답에 필수 요소가 없음
    #[error("missing element <{element}> in {context}")]
    MissingElement { element: String, context: String },

    /// 요소 값을 기대한 타입으로 해석할 수 없음
    #[error("invalid value for <{element}>: {value:?}")]
    InvalidValue { element: String, value: String },

    /// base64 페이로드 디코딩 실패
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// 표준 I/O 에러 래핑
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 설정 값 누락 또는 잘못된 설정
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML 설정 파싱 실패
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// HTTP 클라이언트 에러 (reqwest 래핑)
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 예기치 않은 HTTP 상태 코드 (SOAP fault 본문이 없는 경우)
    #[cfg(feature = "client")]
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },
}

impl From<quick_xml::Error> for SsrsError {
    fn from(err: quick_xml::Error) -> Self {
        SsrsError::Xml(err.to_string())
    }
}

/// [`SsrsError`]를 사용하는 편의 Result 타입 별칭
pub type Result<T> = std::result::Result<T, SsrsError>;
