//! 쇼핑몰 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (상품, 사용자, 로그인)
//! - 쿠키 토큰 기반 접근 게이트와 레벨 기반 권한 관리
//! - PostgreSQL / 인메모리 저장소
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰, 비밀번호, 접근 게이트
//! - [`repository`]: 저장소 추상화와 구현
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    gated, hash_password, verify_password, AccessGate, Claims, CurrentUser, GateError,
    ResourceClass, TokenError, TokenIssuer, TokenVerifier,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;
