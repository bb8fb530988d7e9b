//! 로그인/로그아웃 endpoint.
//!
//! 로그인에 성공하면 토큰을 응답 본문과 `Set-Cookie` 헤더로 함께 돌려줍니다.
//! 존재하지 않는 사용자와 잘못된 비밀번호는 구분하지 않고 같은 401을 반환합니다.
//! 사용자가 없을 때도 더미 해시로 같은 비용의 검증을 수행하므로 응답 시간도 같습니다.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::auth::{auth_cookie, clear_auth_cookie, verify_password_blocking, DUMMY_PASSWORD_HASH};
use crate::error::{api_error, shop_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_login;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// 로그인 실패 시 공통 메시지.
const INVALID_CREDENTIALS: &str = "invalid username or password";

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// 발급된 토큰 (쿠키와 동일)
    pub token: String,
    /// 토큰 유효 시간 (초)
    pub expires_in: i64,
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공, 인증 쿠키 설정", body = LoginResponse),
        (status = 401, description = "사용자 이름 또는 비밀번호 불일치", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = state
        .store
        .find_user_by_username(&req.username)
        .await
        .map_err(|e| {
            record_login("error");
            shop_error(e)
        })?;

    // 사용자가 없어도 같은 비용의 검증을 거쳐 같은 응답을 반환
    let stored_hash = user
        .as_ref()
        .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str())
        .to_string();
    let verified = verify_password_blocking(stored_hash, req.password).await;

    let Some(user) = user.filter(|_| verified) else {
        record_login("invalid_credentials");
        warn!(username = %req.username, "Login failed: invalid credentials");
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            INVALID_CREDENTIALS,
        ));
    };

    let token = state.issuer.issue(user.id).map_err(|e| {
        record_login("error");
        error!(user_id = user.id, error = %e, "Token issue failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal server error",
        )
    })?;

    let max_age = state.token_max_age_secs();
    let cookie = auth_cookie(&state.cookie, &token, max_age).map_err(|e| {
        error!(error = %e, "Auth cookie build failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal server error",
        )
    })?;

    record_login("success");
    info!(user_id = user.id, username = %user.username, "Login successful");

    let body = LoginResponse {
        message: "login successful".to_string(),
        token,
        expires_in: max_age,
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// 로그아웃.
///
/// 서버는 세션을 보관하지 않으므로 쿠키만 만료시킵니다.
/// 이미 발급된 토큰은 만료 시각까지 유효합니다.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses((status = 200, description = "인증 쿠키 제거", body = MessageResponse))
)]
pub async fn logout(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let cookie = clear_auth_cookie(&state.cookie).map_err(|e| {
        error!(error = %e, "Auth cookie build failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal server error",
        )
    })?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("logout successful")),
    )
        .into_response())
}

/// 인증 라우터 생성 (`/api/login`, `/api/logout`).
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}
