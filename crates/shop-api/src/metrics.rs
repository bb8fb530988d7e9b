//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        // HTTP 요청 지속 시간 히스토그램 버킷 설정
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 인증 메트릭 헬퍼 함수
// ============================================================================

/// 접근 거부 카운터 증가.
pub fn record_auth_denial(reason: &str, resource: &str) {
    counter!(
        "auth_denials_total",
        "reason" => reason.to_string(),
        "resource" => resource.to_string()
    )
    .increment(1);
}

/// 로그인 시도 카운터 증가 (`outcome`: success, invalid_credentials, error).
pub fn record_login(outcome: &str) {
    counter!("auth_logins_total", "outcome" => outcome.to_string()).increment(1);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 상품 하위 경로 중 고정 세그먼트.
const PRODUCT_STATIC_SEGMENTS: &[&str] = &["tracksuits", "windbreakers"];

/// 라우트 매칭에 실패한 요청 경로에서 동적 파라미터를 정규화합니다.
///
/// 라벨 카디널리티를 제한하기 위해 숫자 세그먼트는 `{id}`로,
/// 상품 제목 슬러그는 `{title}`로 바꿉니다.
///
/// 예: `/api/users/42` → `/api/users/{id}`, `/api/products/rain-shell` → `/api/products/{title}`
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
            let is_product_slug = i == 3
                && segments.get(1) == Some(&"api")
                && segments.get(2) == Some(&"products")
                && !segment.is_empty()
                && !PRODUCT_STATIC_SEGMENTS.contains(segment);

            if is_numeric {
                "{id}".to_string()
            } else if is_product_slug {
                "{title}".to_string()
            } else {
                (*segment).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/users/12345"), "/api/users/{id}");
    }

    #[test]
    fn test_normalize_path_product_title() {
        assert_eq!(
            normalize_path("/api/products/classic-track-suit"),
            "/api/products/{title}"
        );
    }

    #[test]
    fn test_normalize_path_static_segments() {
        assert_eq!(normalize_path("/api/products/tracksuits"), "/api/products/tracksuits");
        assert_eq!(normalize_path("/api/products"), "/api/products");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn test_normalize_path_root() {
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        // 레코더가 설치되지 않은 상태에서도 패닉하지 않아야 함
        record_auth_denial("missing_token", "users");
        record_login("success");
    }
}
