//! 초기 관리자 계정 생성.
//!
//! 빈 저장소에서는 아무도 사용자 라우트에 접근할 수 없으므로,
//! 설정에 관리자 계정이 지정되어 있으면 시작 시 레벨 0 사용자를 만듭니다.

use shop_core::{NewUser, ShopError, ShopResult, ADMIN_LEVEL};
use tracing::{debug, info};

use crate::auth::hash_password_blocking;
use crate::repository::Storage;

/// 관리자 계정이 없으면 생성합니다.
///
/// 같은 이름의 사용자가 이미 있으면 아무것도 하지 않고 `false`를 반환합니다.
/// 기존 사용자의 비밀번호나 레벨은 변경하지 않습니다.
pub async fn ensure_admin(store: &dyn Storage, username: &str, password: &str) -> ShopResult<bool> {
    if store.find_user_by_username(username).await?.is_some() {
        debug!(username, "Bootstrap admin already exists");
        return Ok(false);
    }

    let password_hash = hash_password_blocking(password.to_string())
        .await
        .map_err(|e| ShopError::Internal(e.to_string()))?;

    let admin = store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash,
            level: ADMIN_LEVEL,
        })
        .await?;

    info!(user_id = admin.id, username, "Bootstrap admin created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn test_creates_admin_once() {
        let store = MemoryStore::new();

        assert!(ensure_admin(&store, "root", "changeme").await.unwrap());
        assert!(!ensure_admin(&store, "root", "other").await.unwrap());

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].level, ADMIN_LEVEL);
        assert!(verify_password(&users[0].password_hash, "changeme"));
    }
}
