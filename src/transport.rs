//! SOAP 전송 계층: 요청 envelope을 엔드포인트로 보내고 응답 본문을 받습니다.
//!
//! [`SoapTransport`]는 파사드와 네트워크 사이의 경계입니다. 파사드는 엔드포인트마다
//! 전송 객체 하나를 생성 시점에 받아 수명 동안 사용하며, 실행 세션 ID는
//! [`SoapRequest`]에 실려 호출 단위로 전달되므로 전송 객체는 상태를 갖지 않습니다.
//!
//! 기본 구현 [`HttpSoapTransport`]는 feature `"client"` 활성화 시 제공됩니다.

use async_trait::async_trait;

use crate::codec::SoapRequest;
use crate::error::Result;

/// SOAP 요청 한 건을 보내고 응답 본문(XML)을 돌려주는 전송 계층
///
/// 구현체는 SOAP fault를 [`SsrsError::SoapFault`](crate::error::SsrsError::SoapFault)로,
/// 그 외 전송 실패를 자체 에러 변형으로 보고해야 합니다.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// 요청을 보내고 응답 envelope 문자열을 반환합니다.
    async fn call(&self, request: &SoapRequest) -> Result<String>;
}

#[async_trait]
impl<T: SoapTransport + ?Sized> SoapTransport for Box<T> {
    async fn call(&self, request: &SoapRequest) -> Result<String> {
        (**self).call(request).await
    }
}

#[async_trait]
impl<T: SoapTransport + ?Sized> SoapTransport for std::sync::Arc<T> {
    async fn call(&self, request: &SoapRequest) -> Result<String> {
        (**self).call(request).await
    }
}

#[cfg(feature = "client")]
pub use http::HttpSoapTransport;

#[cfg(feature = "client")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};
    use tracing::{debug, trace, warn};

    use super::SoapTransport;
    use crate::codec::{SoapRequest, check_fault};
    use crate::config::SsrsConfig;
    use crate::constants::SOAP_CONTENT_TYPE;
    use crate::error::{Result, SsrsError};

    /// reqwest 기반 SOAP 1.1 전송
    ///
    /// 엔드포인트 URL 하나에 묶이며, 설정의 사용자명/비밀번호를 HTTP Basic 자격 증명으로 보냅니다.
    /// cookie_store를 활성화하여 서버가 발급한 세션 쿠키를 유지합니다.
    pub struct HttpSoapTransport {
        /// reqwest HTTP 클라이언트 (cookie_store 활성화)
        http: Client,
        /// 엔드포인트 전체 URL (예: `"https://host/ReportServer/ReportService2010.asmx"`)
        endpoint_url: String,
        /// 사용자명 (빈 문자열이면 인증 헤더 생략)
        username: String,
        /// 비밀번호
        password: String,
    }

    impl HttpSoapTransport {
        /// 엔드포인트 URL과 설정으로 전송 객체를 생성합니다.
        ///
        /// # 에러
        ///
        /// - [`SsrsError::Http`]: reqwest 클라이언트 생성 실패 (TLS 백엔드 초기화 등)
        pub fn new(endpoint_url: impl Into<String>, config: &SsrsConfig) -> Result<Self> {
            let http = Client::builder()
                .cookie_store(true)
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?;

            Ok(Self {
                http,
                endpoint_url: endpoint_url.into(),
                username: config.username.clone(),
                password: config.password.clone(),
            })
        }

        /// 엔드포인트 URL
        pub fn endpoint_url(&self) -> &str {
            &self.endpoint_url
        }
    }

    #[async_trait]
    impl SoapTransport for HttpSoapTransport {
        async fn call(&self, request: &SoapRequest) -> Result<String> {
            debug!(
                operation = request.operation,
                endpoint = %self.endpoint_url,
                with_session = request.execution_id.is_some(),
                "sending SOAP request"
            );
            trace!(bytes = request.envelope.len(), "request envelope");

            let mut builder = self
                .http
                .post(&self.endpoint_url)
                .header(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE))
                .header("SOAPAction", format!("\"{}\"", request.action))
                .body(request.envelope.clone());
            if !self.username.is_empty() {
                builder = builder.basic_auth(&self.username, Some(&self.password));
            }

            let resp = builder.send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            trace!(status = status.as_u16(), bytes = body.len(), "response received");

            if !status.is_success() {
                // NOTE: SOAP 1.1 faults arrive with HTTP 500
                if let Some((code, message)) = check_fault(&body) {
                    warn!(operation = request.operation, %code, %message, "SOAP fault");
                    return Err(SsrsError::SoapFault { code, message });
                }
                warn!(operation = request.operation, status = status.as_u16(), "HTTP error");
                return Err(SsrsError::HttpStatus {
                    status: status.as_u16(),
                });
            }

            Ok(body)
        }
    }

}
