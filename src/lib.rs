//! # ssrs
//!
//! SQL Server Reporting Services(SSRS) SOAP 클라이언트 라이브러리.
//!
//! 관리 엔드포인트(`ReportService2010.asmx`)로 카탈로그를 탐색하고,
//! 실행 엔드포인트(`ReportExecution2005.asmx`)로 보고서를 로드/파라미터 설정/렌더링합니다.
//!
//! ## 모듈 구조
//!
//! - [`constants`]: 엔드포인트 경로, 네임스페이스, 치환 토큰 상수
//! - [`error`]: 에러 타입 ([`SsrsError`])
//! - [`config`]: 접속 설정 ([`SsrsConfig`]), 코드/TOML/환경 변수에서 로드
//! - [`types`]: 공유 타입 정의 ([`CatalogItems`], [`ExecutionInfo`], [`RenderOutput`] 등)
//! - [`wire`]: 저수준 XML I/O ([`XmlNode`](wire::XmlNode), [`XmlWriter`](wire::XmlWriter), [`OneOrMany`](wire::OneOrMany))
//! - [`field`]: 응답 요소 → 타입 디코딩 ([`FromXml`](field::FromXml))
//! - [`device_info`]: 렌더링 장치 정보 XML 빌더 ([`DeviceInfo`])
//! - [`codec`]: SOAP 코덱 (요청 envelope 빌더 + 응답 파서)
//! - [`transport`]: 전송 계층 ([`SoapTransport`](transport::SoapTransport)), HTTP 구현은 feature `"client"` 활성화 시
//! - [`client`]: 파사드 ([`SsrsClient`])
//!
//! ## 사용 예시
//!
//! ```rust
//! use ssrs::{DeviceInfo, ExecutionParameters};
//! use ssrs::device_info::{Placeholders, render_device_info};
//!
//! let params = ExecutionParameters::from_pairs([("Region", vec!["North", "South"])]);
//! assert_eq!(params.len(), 2);
//!
//! let info = DeviceInfo::new().with("Toolbar", false);
//! let xml = render_device_info(&info, &Placeholders::none());
//! assert_eq!(xml, "<DeviceInfo><Toolbar>false</Toolbar></DeviceInfo>");
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod device_info;
pub mod error;
pub mod field;
pub mod transport;
pub mod types;
pub mod wire;

// NOTE: Selective re-export: only expose commonly used types
pub use client::SsrsClient;
pub use config::SsrsConfig;
pub use device_info::{DeviceInfo, DeviceInfoValue};
pub use error::{Result, SsrsError};
pub use transport::SoapTransport;
#[cfg(feature = "client")]
pub use transport::HttpSoapTransport;
pub use types::{
    CatalogItem, CatalogItems, ExecutionInfo, ExecutionParameters, Extensions, ItemDefinition,
    PaginationMode, Properties, RenderOutput, RenderStream, ReportParameterValue, SortDirection,
    SortResult,
};
