//! 쇼핑몰 백엔드의 에러 타입.
//!
//! 저장소, 설정, 입력 검증 등 인증 게이트 바깥의 실패를 표현합니다.
//! 인증/인가 실패는 `shop-api`의 `auth` 모듈에서 별도로 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum ShopError {
    /// 설정 에러 (시작 시점에 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 중복 (예: 이미 존재하는 사용자 이름)
    #[error("중복: {0}")]
    Conflict(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 쇼핑몰 작업을 위한 Result 타입.
pub type ShopResult<T> = Result<T, ShopError>;

impl ShopError {
    /// 유일성 제약 위반을 클라이언트에 노출 가능한 [`ShopError::Conflict`]로 변환합니다.
    ///
    /// 제약 이름이나 DB 메시지는 응답에 포함하지 않습니다.
    pub fn unique_violation(constraint: Option<&str>) -> Self {
        let message = match constraint {
            Some("users_username_key") => "username already exists",
            Some("products_title_key") => "product title already exists",
            _ => "already exists",
        };
        ShopError::Conflict(message.to_string())
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::InvalidInput(err.to_string())
    }
}

impl From<config::ConfigError> for ShopError {
    fn from(err: config::ConfigError) -> Self {
        ShopError::Config(err.to_string())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ShopError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ShopError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                tracing::debug!(
                    constraint = ?db.constraint(),
                    error = %db.message(),
                    "Unique constraint violated"
                );
                ShopError::unique_violation(db.constraint())
            }
            other => ShopError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_hides_constraint() {
        let cases = [
            (Some("users_username_key"), "username already exists"),
            (Some("products_title_key"), "product title already exists"),
            (Some("some_internal_idx"), "already exists"),
            (None, "already exists"),
        ];

        for (constraint, expected) in cases {
            match ShopError::unique_violation(constraint) {
                ShopError::Conflict(message) => {
                    assert_eq!(message, expected);
                    assert!(!message.contains("_key"));
                    assert!(!message.contains("_idx"));
                }
                other => panic!("expected Conflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let shop_err: ShopError = err.into();
        assert!(matches!(shop_err, ShopError::InvalidInput(_)));
    }
}
