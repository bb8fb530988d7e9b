//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성하고
//! `/api-docs/openapi.json`에서 JSON으로 제공합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::{routing::get, Json, Router};
use shop_core::Product;
use utoipa::OpenApi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, CreateUserRequest, CreatedResponse, HealthResponse,
    LoginRequest, LoginResponse, MessageResponse, UpdateUserRequest, UserResponse,
};

/// OpenAPI JSON 경로.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Shop API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        description = r#"
# 의류 쇼핑몰 REST API

상품 조회와 관리자용 상품/사용자 관리를 제공합니다.

## 인증

`POST /api/login`이 `token` 쿠키(HttpOnly, SameSite=Strict)를 설정합니다.
보호된 엔드포인트는 이 쿠키를 요구하며, 사용자 레벨이 낮을수록 넓은 권한을 가집니다.

- 상품 생성/수정/삭제: 레벨 1 이하
- 사용자 관리: 레벨 0
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인/로그아웃"),
        (name = "products", description = "상품 - 조회 및 관리"),
        (name = "users", description = "사용자 - 계정 및 권한 레벨 관리")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,
            CreatedResponse,

            // ===== Auth =====
            LoginRequest,
            LoginResponse,

            // ===== Products =====
            Product,

            // ===== Users =====
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,
        crate::routes::auth::logout,

        // ===== Products =====
        crate::routes::products::list_products,
        crate::routes::products::list_tracksuits,
        crate::routes::products::list_windbreakers,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,

        // ===== Users =====
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::get_user,
        crate::routes::users::delete_user,
    )
)]
pub struct ApiDoc;

/// OpenAPI JSON 라우터 생성.
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
