//! 보고서를 렌더링하여 파일로 저장하는 CLI 예제
//!
//! 접속 정보는 환경 변수에서 읽습니다 (`SSRS_BASE_URI`, `SSRS_USERNAME`, `SSRS_PASSWORD`).
//!
//! 사용법:
//! ```bash
//! cargo run --example render_report -- <report_path> <format> <out_file> [Name=Value ...]
//! ```
//!
//! 예시:
//! ```bash
//! RUST_LOG=ssrs=debug cargo run --example render_report -- /Sales/Monthly PDF monthly.pdf Year=2024 Region=N Region=S
//! ```

use std::env;

use serde::Serialize;
use ssrs::{
    CatalogItem, DeviceInfo, ExecutionParameters, PaginationMode, RenderOutput, SsrsClient,
    SsrsConfig,
};
use tracing_subscriber::EnvFilter;

/// JSON 출력용 데이터 구조
#[derive(Debug, Serialize)]
struct OutputData {
    /// 성공 여부
    success: bool,
    /// 메시지 (에러 시 에러 메시지)
    message: String,
    /// 보고서가 속한 폴더의 항목
    siblings: Vec<CatalogItem>,
    /// 렌더링 결과 메타데이터
    render: Option<RenderOutput>,
}

impl OutputData {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            siblings: Vec::new(),
            render: None,
        }
    }
}

fn print_usage() {
    eprintln!("SSRS 보고서 렌더링 CLI");
    eprintln!();
    eprintln!("사용법:");
    eprintln!("  cargo run --example render_report -- <report_path> <format> <out_file> [Name=Value ...]");
    eprintln!();
    eprintln!("환경 변수:");
    eprintln!("  SSRS_BASE_URI     - 보고서 서버 URI (예: https://host/ReportServer)");
    eprintln!("  SSRS_USERNAME     - 사용자명");
    eprintln!("  SSRS_PASSWORD     - 비밀번호");
    eprintln!("  SSRS_TIMEOUT_SECS - 요청 타임아웃 (초)");
}

/// `Name=Value` 인자를 실행 파라미터로 모읍니다. 같은 이름은 다중 값이 됩니다.
fn parse_parameters(args: &[String]) -> Result<ExecutionParameters, String> {
    let mut params = ExecutionParameters::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("잘못된 파라미터: {arg} (Name=Value 형식)"))?;
        params.add(name, value);
    }
    Ok(params)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        print_usage();
        std::process::exit(1);
    }

    let result = render_report(&args[1], &args[2], &args[3], &args[4..]).await;

    // JSON 출력
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("JSON 직렬화 실패: {}", e);
            std::process::exit(1);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
}

async fn render_report(
    report_path: &str,
    format: &str,
    out_file: &str,
    raw_params: &[String],
) -> OutputData {
    let params = match parse_parameters(raw_params) {
        Ok(p) => p,
        Err(e) => return OutputData::failure(e),
    };

    let config = match SsrsConfig::from_env() {
        Ok(c) => c,
        Err(e) => return OutputData::failure(format!("설정 로드 실패: {}", e)),
    };

    let mut client = match SsrsClient::from_config(config) {
        Ok(c) => c,
        Err(e) => return OutputData::failure(format!("클라이언트 생성 실패: {}", e)),
    };

    // 1. 보고서가 속한 폴더 조회
    let folder = match report_path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    };
    let siblings = match client.list_children(folder, false).await {
        Ok(items) => items.into_vec(),
        Err(e) => return OutputData::failure(format!("폴더 조회 실패: {}", e)),
    };

    // 2. 보고서 로드 + 세션 설정
    let info = match client.load_report(report_path, None).await {
        Ok(i) => i,
        Err(e) => return OutputData::failure(format!("보고서 로드 실패: {}", e)),
    };
    client.set_session_id(info.execution_id());

    // 3. 파라미터 설정
    if !params.is_empty() {
        if let Err(e) = client.set_execution_parameters(&params).await {
            return OutputData::failure(format!("파라미터 설정 실패: {}", e));
        }
    }

    // 4. 렌더링
    let output = match client
        .render(format, &DeviceInfo::new(), PaginationMode::Estimate)
        .await
    {
        Ok(o) => o,
        Err(e) => return OutputData::failure(format!("렌더링 실패: {}", e)),
    };

    if let Err(e) = std::fs::write(out_file, output.bytes()) {
        return OutputData::failure(format!("파일 저장 실패: {}", e));
    }

    OutputData {
        success: true,
        message: format!("렌더링 성공: {} ({} bytes)", out_file, output.len()),
        siblings,
        render: Some(output),
    }
}
