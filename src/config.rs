//! 연결 설정: 코드, TOML 파일, 환경 변수에서 SSRS 접속 정보를 읽습니다.
//!
//! ```toml
//! base_uri = "https://reports.example.com/ReportServer"
//! username = "DOMAIN\\reporter"
//! password = "secret"
//! timeout_secs = 120
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TIMEOUT_SECS, ENV_BASE_URI, ENV_PASSWORD, ENV_TIMEOUT_SECS, ENV_USERNAME,
    EXECUTION_PATH, SERVICE_PATH, USER_AGENT,
};
use crate::error::{Result, SsrsError};

/// SSRS 접속 설정
///
/// `base_uri`의 끝 슬래시는 항상 제거됩니다.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SsrsConfig {
    /// 보고서 서버 기본 URI (예: `"https://host/ReportServer"`)
    pub base_uri: String,
    /// 사용자명
    #[serde(default)]
    pub username: String,
    /// 비밀번호
    #[serde(default)]
    pub password: String,
    /// 관리 서비스 상대 경로
    #[serde(default = "default_service_path")]
    pub service_path: String,
    /// 실행 서비스 상대 경로
    #[serde(default = "default_execution_path")]
    pub execution_path: String,
    /// HTTP 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// HTTP User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_service_path() -> String {
    SERVICE_PATH.to_string()
}

fn default_execution_path() -> String {
    EXECUTION_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn trim_base_uri(uri: &str) -> String {
    uri.trim_end_matches('/').to_string()
}

impl fmt::Debug for SsrsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SsrsConfig")
            .field("base_uri", &self.base_uri)
            .field("username", &self.username)
            .field("password", &"***")
            .field("service_path", &self.service_path)
            .field("execution_path", &self.execution_path)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl SsrsConfig {
    /// 기본 URI와 자격 증명으로 설정을 생성합니다. 나머지는 기본값입니다.
    ///
    /// ```
    /// use ssrs::config::SsrsConfig;
    ///
    /// let config = SsrsConfig::new("https://host/ReportServer//", "user", "pw");
    /// assert_eq!(config.base_uri, "https://host/ReportServer");
    /// assert_eq!(config.service_url(), "https://host/ReportServer/ReportService2010.asmx");
    /// ```
    pub fn new(base_uri: &str, username: &str, password: &str) -> Self {
        Self {
            base_uri: trim_base_uri(base_uri),
            username: username.to_string(),
            password: password.to_string(),
            service_path: default_service_path(),
            execution_path: default_execution_path(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// TOML 문자열에서 설정을 읽습니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::ConfigParse`]: TOML 문법/타입 오류
    /// - [`SsrsError::Config`]: `base_uri`가 비어 있음
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut config: SsrsConfig = toml::from_str(s)?;
        config.base_uri = trim_base_uri(&config.base_uri);
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 읽습니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::Io`]: 파일 읽기 실패
    /// - [`from_toml_str`](Self::from_toml_str)의 모든 에러
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 프로세스 환경 변수에서 설정을 읽습니다.
    ///
    /// - `SSRS_BASE_URI` (필수)
    /// - `SSRS_USERNAME`, `SSRS_PASSWORD` (선택, 기본 빈 문자열)
    /// - `SSRS_TIMEOUT_SECS` (선택)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 환경 변수 방식의 설정을 읽습니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::Config`]: `SSRS_BASE_URI` 누락 또는 잘못된 `SSRS_TIMEOUT_SECS`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_uri = lookup(ENV_BASE_URI)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SsrsError::Config(format!("{ENV_BASE_URI} is not set")))?;
        let username = lookup(ENV_USERNAME).unwrap_or_default();
        let password = lookup(ENV_PASSWORD).unwrap_or_default();

        let mut config = Self::new(&base_uri, &username, &password);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                SsrsError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {raw:?}"))
            })?;
        }
        Ok(config)
    }

    /// 설정 값을 검증합니다.
    ///
    /// # 에러
    ///
    /// - [`SsrsError::Config`]: `base_uri`가 비어 있음
    pub fn validate(&self) -> Result<()> {
        if self.base_uri.trim().is_empty() {
            return Err(SsrsError::Config("base_uri must not be empty".to_string()));
        }
        Ok(())
    }

    /// 관리 서비스 엔드포인트 전체 URL
    pub fn service_url(&self) -> String {
        format!("{}/{}", self.base_uri, self.service_path)
    }

    /// 실행 서비스 엔드포인트 전체 URL
    pub fn execution_url(&self) -> String {
        format!("{}/{}", self.base_uri, self.execution_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_trims_trailing_slashes() {
        let config = SsrsConfig::new("https://host/ReportServer///", "u", "p");
        assert_eq!(config.base_uri, "https://host/ReportServer");
        assert_eq!(
            config.execution_url(),
            "https://host/ReportServer/ReportExecution2005.asmx"
        );
    }

    #[test]
    fn test_defaults() {
        let config = SsrsConfig::new("http://h", "", "");
        assert_eq!(config.service_path, SERVICE_PATH);
        assert_eq!(config.execution_path, EXECUTION_PATH);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.user_agent, USER_AGENT);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SsrsConfig::new("http://h", "user", "hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_from_toml_minimal() {
        let config = SsrsConfig::from_toml_str(r#"base_uri = "http://h/ReportServer/""#).unwrap();
        assert_eq!(config.base_uri, "http://h/ReportServer");
        assert_eq!(config.username, "");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
            base_uri = "https://reports.example.com/ReportServer"
            username = 'DOMAIN\reporter'
            password = "secret"
            service_path = "ReportService2010.asmx"
            execution_path = "custom/ReportExecution2005.asmx"
            timeout_secs = 5
            user_agent = "nightly-export"
        "#;
        let config = SsrsConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.username, "DOMAIN\\reporter");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.execution_url(),
            "https://reports.example.com/ReportServer/custom/ReportExecution2005.asmx"
        );
        assert_eq!(config.user_agent, "nightly-export");
    }

    #[test]
    fn test_from_toml_missing_base_uri() {
        let err = SsrsConfig::from_toml_str(r#"username = "u""#).unwrap_err();
        assert!(matches!(err, SsrsError::ConfigParse(_)));
    }

    #[test]
    fn test_from_toml_empty_base_uri() {
        let err = SsrsConfig::from_toml_str(r#"base_uri = "/""#).unwrap_err();
        assert!(matches!(err, SsrsError::Config(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = SsrsConfig::from_file("/definitely/not/here/ssrs.toml").unwrap_err();
        assert!(matches!(err, SsrsError::Io(_)));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URI, "http://h/ReportServer/"),
            (ENV_USERNAME, "reporter"),
            (ENV_PASSWORD, "pw"),
            (ENV_TIMEOUT_SECS, "15"),
        ]);
        let config = SsrsConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_uri, "http://h/ReportServer");
        assert_eq!(config.username, "reporter");
        assert_eq!(config.password, "pw");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_from_lookup_requires_base_uri() {
        let err = SsrsConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains(ENV_BASE_URI));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = SsrsConfig::from_lookup(|k| match k {
            ENV_BASE_URI => Some("http://h".to_string()),
            ENV_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, SsrsError::Config(_)));
    }
}
