//! 사용자 관리 endpoint.
//!
//! 모든 라우트는 사용자 리소스 게이트(레벨 0) 뒤에 있습니다.
//! 요청의 평문 비밀번호는 서버에서 해싱되며 응답에는 해시가 포함되지 않습니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use shop_core::{NewUser, User};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::auth::{gated, hash_password_blocking, CurrentUser, PasswordError, ResourceClass};
use crate::error::{api_error, shop_error, ApiErrorResponse, ApiResult};
use crate::routes::{CreatedResponse, MessageResponse};
use crate::state::AppState;

/// 사용자 응답 (비밀번호 해시 제외).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    /// 권한 레벨 (작을수록 넓은 권한)
    pub level: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            level: user.level,
        }
    }
}

/// 사용자 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub level: i32,
}

/// 사용자 수정 요청.
///
/// `password`를 생략하면 기존 비밀번호를 유지합니다.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub id: i32,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub level: i32,
}

fn hashing_failed(e: PasswordError) -> (StatusCode, Json<ApiErrorResponse>) {
    error!(error = %e, "Password hashing failed");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "internal server error",
    )
}

fn user_not_found(id: i32) -> (StatusCode, Json<ApiErrorResponse>) {
    api_error(
        StatusCode::NOT_FOUND,
        "USER_NOT_FOUND",
        format!("user not found: {}", id),
    )
}

/// 전체 사용자 목록.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "사용자 목록", body = Vec<UserResponse>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 부족", body = ApiErrorResponse)
    )
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users().await.map_err(shop_error)?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// 사용자 생성.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "생성된 사용자 ID", body = CreatedResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 409, description = "이미 존재하는 사용자 이름", body = ApiErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let new_user = NewUser {
        username: req.username,
        password_hash: hash_password_blocking(req.password)
            .await
            .map_err(hashing_failed)?,
        level: req.level,
    };

    let user = state.store.create_user(new_user).await.map_err(shop_error)?;

    info!(
        actor_id = actor.id,
        user_id = user.id,
        username = %user.username,
        level = user.level,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: user.id })))
}

/// 사용자 수정.
#[utoipa::path(
    put,
    path = "/api/users",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정 완료", body = MessageResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let existing = state
        .store
        .find_user_by_id(req.id)
        .await
        .map_err(shop_error)?
        .ok_or_else(|| user_not_found(req.id))?;

    let password_changed = req.password.is_some();
    let password_hash = match req.password {
        Some(password) => hash_password_blocking(password)
            .await
            .map_err(hashing_failed)?,
        None => existing.password_hash,
    };

    let user = User {
        id: req.id,
        username: req.username,
        password_hash,
        level: req.level,
    };

    if !state.store.update_user(&user).await.map_err(shop_error)? {
        return Err(user_not_found(req.id));
    }

    info!(
        actor_id = actor.id,
        user_id = user.id,
        level = user.level,
        password_changed,
        "User updated"
    );
    Ok(Json(MessageResponse::new("user updated")))
}

/// 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자", body = UserResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .store
        .find_user_by_id(id)
        .await
        .map_err(shop_error)?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user.into()))
}

/// 사용자 삭제.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "삭제 완료", body = MessageResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.delete_user(id).await.map_err(shop_error)? {
        return Err(user_not_found(id));
    }

    info!(actor_id = actor.id, user_id = id, "User deleted");
    Ok(Json(MessageResponse::new("user deleted")))
}

/// 사용자 라우터 생성.
pub fn users_router(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            gated(
                state,
                ResourceClass::User,
                get(list_users).post(create_user).put(update_user),
            ),
        )
        .route(
            "/{id}",
            gated(state, ResourceClass::User, get(get_user).delete(delete_user)),
        )
}
