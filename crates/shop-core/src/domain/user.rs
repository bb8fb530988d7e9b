//! 사용자(Principal) 도메인 모델.

use serde::{Deserialize, Serialize};

use crate::error::{ShopError, ShopResult};

/// 가장 높은 권한 레벨 (관리자).
pub const ADMIN_LEVEL: i32 = 0;

/// 인증 주체가 되는 사용자 계정.
///
/// `level`은 작을수록 더 넓은 권한을 의미합니다. `password_hash`는 PHC 형식의
/// 솔트 포함 해시이며 클라이언트로 직렬화되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub level: i32,
}

impl User {
    /// 수정된 사용자 필드 검증.
    pub fn validate(&self) -> ShopResult<()> {
        validate_user_fields(&self.username, self.level)
    }
}

/// 저장소에 새로 기록할 사용자.
///
/// 비밀번호는 이미 해싱된 상태여야 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub level: i32,
}

impl NewUser {
    /// 사용자 입력 검증.
    ///
    /// 이름이 비어 있거나 레벨이 음수면 [`ShopError::InvalidInput`].
    pub fn validate(&self) -> ShopResult<()> {
        validate_user_fields(&self.username, self.level)
    }

    /// 발급된 id를 붙여 [`User`]로 변환합니다.
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            level: self.level,
        }
    }
}

fn validate_user_fields(username: &str, level: i32) -> ShopResult<()> {
    if username.trim().is_empty() {
        return Err(ShopError::InvalidInput("username must not be empty".to_string()));
    }
    if level < ADMIN_LEVEL {
        return Err(ShopError::InvalidInput(format!(
            "level must be >= {}, got {}",
            ADMIN_LEVEL, level
        )));
    }
    Ok(())
}
