//! 접근 게이트.
//!
//! 보호된 라우트 앞에서 쿠키 토큰을 검증하고, 토큰이 가리키는 사용자를
//! 저장소에서 조회한 뒤 리소스 클래스의 레벨 규칙을 적용합니다.
//!
//! 거부 응답의 본문은 원인과 관계없이 동일합니다. 구체적인 원인은
//! 감사 로그와 `auth_denials_total` 메트릭으로만 남습니다.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json,
};
use shop_core::User;
use tracing::{debug, error, info, warn};

use super::cookie::parse_cookie;
use super::jwt::{TokenError, TokenVerifier};
use super::roles::ResourceClass;
use crate::error::ApiErrorResponse;
use crate::metrics::record_auth_denial;
use crate::repository::SharedStorage;
use crate::state::AppState;

/// 모든 거부 응답에 공통으로 쓰이는 메시지.
pub const DENIED_MESSAGE: &str = "not authorized";

/// 게이트 거부 사유.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// 토큰이 없거나 검증에 실패
    #[error("인증 실패: {0:?}")]
    Unauthenticated(Option<TokenError>),

    /// 토큰은 유효하지만 사용자가 존재하지 않음
    #[error("사용자를 찾을 수 없습니다: {0}")]
    PrincipalNotFound(i32),

    /// 사용자 레벨이 리소스 허용 범위를 벗어남
    #[error("권한 부족: user={user_id}, level={level}, resource={resource}")]
    Forbidden {
        user_id: i32,
        level: i32,
        resource: ResourceClass,
    },

    /// 사용자 조회 중 저장소 에러
    #[error("저장소 에러: {0}")]
    Store(String),
}

impl GateError {
    /// 메트릭 라벨용 거부 사유.
    pub fn reason(&self) -> &'static str {
        match self {
            GateError::Unauthenticated(None) => "missing_token",
            GateError::Unauthenticated(Some(e)) => e.reason(),
            GateError::PrincipalNotFound(_) => "principal_not_found",
            GateError::Forbidden { .. } => "forbidden",
            GateError::Store(_) => "store_error",
        }
    }

    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Unauthenticated(_) | GateError::PrincipalNotFound(_) => {
                StatusCode::UNAUTHORIZED
            }
            GateError::Forbidden { .. } => StatusCode::FORBIDDEN,
            GateError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error"
        } else {
            DENIED_MESSAGE
        };
        (status, Json(ApiErrorResponse::simple(self.code(), message))).into_response()
    }
}

/// 게이트를 통과한 요청의 사용자.
///
/// 요청 extension에 저장되며 핸들러에서 `Extension<CurrentUser>`로 꺼냅니다.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 토큰 검증 → 사용자 조회 → 레벨 확인을 수행하는 게이트.
#[derive(Clone)]
pub struct AccessGate {
    store: SharedStorage,
    verifier: TokenVerifier,
}

impl AccessGate {
    pub fn new(store: SharedStorage, verifier: TokenVerifier) -> Self {
        Self { store, verifier }
    }

    /// 요청을 인가합니다.
    ///
    /// 토큰이 없거나 검증에 실패하면 저장소를 조회하지 않습니다.
    /// 거부될 때마다 감사 로그와 메트릭을 남깁니다.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        resource: ResourceClass,
    ) -> Result<User, GateError> {
        let result = self.check(token, resource).await;
        if let Err(e) = &result {
            audit_denial(e, resource);
        }
        result
    }

    async fn check(&self, token: Option<&str>, resource: ResourceClass) -> Result<User, GateError> {
        let token = token.ok_or(GateError::Unauthenticated(None))?;

        let user_id = self
            .verifier
            .verify(token)
            .map_err(|e| GateError::Unauthenticated(Some(e)))?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?
            .ok_or(GateError::PrincipalNotFound(user_id))?;

        if !resource.permits(user.level) {
            return Err(GateError::Forbidden {
                user_id: user.id,
                level: user.level,
                resource,
            });
        }

        Ok(user)
    }
}

fn audit_denial(err: &GateError, resource: ResourceClass) {
    record_auth_denial(err.reason(), resource.as_str());

    match err {
        GateError::Forbidden {
            user_id, level, ..
        } => {
            warn!(
                user_id,
                level,
                resource = %resource,
                max_level = resource.max_level(),
                "Access denied: insufficient level"
            );
        }
        GateError::PrincipalNotFound(user_id) => {
            warn!(user_id, resource = %resource, "Access denied: token subject not found");
        }
        GateError::Store(e) => {
            error!(resource = %resource, error = %e, "Access check failed: store error");
        }
        GateError::Unauthenticated(_) => {
            info!(resource = %resource, reason = err.reason(), "Access denied: unauthenticated");
        }
    }
}

/// 게이트 미들웨어 상태.
#[derive(Clone)]
pub struct GateContext {
    gate: AccessGate,
    resource: ResourceClass,
    cookie_name: Arc<str>,
}

impl GateContext {
    pub fn new(state: &AppState, resource: ResourceClass) -> Self {
        Self {
            gate: state.access_gate(),
            resource,
            cookie_name: Arc::from(state.cookie.name.as_str()),
        }
    }
}

/// 접근 게이트 미들웨어.
///
/// 통과한 요청에는 [`CurrentUser`]를 extension으로 추가합니다.
pub async fn access_gate(
    State(ctx): State<GateContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, GateError> {
    let token = parse_cookie(request.headers(), &ctx.cookie_name);
    let user = ctx.gate.authorize(token.as_deref(), ctx.resource).await?;

    debug!(
        user_id = user.id,
        resource = %ctx.resource,
        method = %request.method(),
        path = request.uri().path(),
        "Access granted"
    );

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// 메서드 라우터의 모든 핸들러 앞에 접근 게이트를 둡니다.
///
/// ```rust,ignore
/// let route = get(list_products).merge(gated(
///     &state,
///     ResourceClass::Product,
///     post(create_product).put(update_product),
/// ));
/// ```
pub fn gated(
    state: &AppState,
    resource: ResourceClass,
    route: MethodRouter<Arc<AppState>>,
) -> MethodRouter<Arc<AppState>> {
    route.route_layer(middleware::from_fn_with_state(
        GateContext::new(state, resource),
        access_gate,
    ))
}
