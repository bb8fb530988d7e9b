//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use shop_core::ShopError;
use tracing::error;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "상품을 찾을 수 없습니다: rain shell",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND", "UNAUTHORIZED")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// ```
    /// use shop_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("NOT_FOUND", "Product not found");
    /// assert_eq!(error.code(), "NOT_FOUND");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    ///
    /// 인증 거부처럼 응답 본문이 항상 같아야 하는 경우에 사용합니다.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: None,
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 상태 코드와 에러 본문을 묶어 반환합니다.
pub fn api_error(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// [`ShopError`]를 HTTP 에러 응답으로 변환합니다.
///
/// 서버 측 에러(설정, DB, 내부)는 로그에만 상세 내용을 남기고
/// 클라이언트에는 일반 메시지를 반환합니다.
///
/// ```ignore
/// let products = state.store.list_products().await.map_err(shop_error)?;
/// ```
pub fn shop_error(err: ShopError) -> (StatusCode, Json<ApiErrorResponse>) {
    match err {
        ShopError::NotFound(msg) => api_error(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
        ShopError::InvalidInput(msg) => api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
        ShopError::Conflict(msg) => api_error(StatusCode::CONFLICT, "CONFLICT", msg),
        err @ (ShopError::Database(_) | ShopError::Config(_) | ShopError::Internal(_)) => {
            error!(error = %err, "Request failed with server error");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal server error",
            )
        }
    }
}
