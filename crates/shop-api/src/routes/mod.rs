//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/login`, `/api/logout` - 인증 쿠키 발급/제거
//! - `/api/products` - 상품 (조회 공개, 변경은 레벨 1 이하)
//! - `/api/users` - 사용자 관리 (레벨 0)

pub mod auth;
pub mod health;
pub mod products;
pub mod users;

pub use auth::{auth_router, LoginRequest, LoginResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use products::products_router;
pub use users::{users_router, CreateUserRequest, UpdateUserRequest, UserResponse};

use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 단순 메시지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 생성 응답 (새 리소스 ID).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i32,
}

/// 전체 API 라우터 생성.
///
/// 보호된 라우트의 게이트가 토큰 검증기와 저장소를 필요로 하므로
/// 상태를 받아 라우터를 구성합니다. 반환된 라우터에 같은 상태로
/// `with_state`를 호출해야 합니다.
pub fn create_api_router(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API 엔드포인트
        .merge(auth_router())
        .nest("/api/products", products_router(state))
        .nest("/api/users", users_router(state))
}
