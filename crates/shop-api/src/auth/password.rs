//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, error};

/// 존재하지 않는 사용자로 로그인할 때 대신 검증하는 해시.
///
/// `Argon2::default()`와 같은 파라미터라서 실제 사용자 검증과 비용이 같습니다.
/// 어떤 비밀번호로도 일치하지 않습니다.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하며 솔트는 자동으로 생성됩니다.
/// 비용 파라미터(m, t, p)는 PHC 문자열에 함께 기록됩니다.
///
/// # Example
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 해시와 입력된 비밀번호를 비교합니다. 해시 파싱 실패를 포함한
/// 모든 에러는 불일치로 처리합니다.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(e) => {
            debug!(error = %e, "stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .is_ok()
}

/// [`hash_password`]를 blocking thread pool에서 실행합니다.
///
/// Argon2 연산이 Tokio worker thread를 점유하지 않도록 핸들러에서는 이 함수를 사용합니다.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            PasswordError::HashingFailed
        })?
}

/// [`verify_password`]를 blocking thread pool에서 실행합니다.
///
/// 태스크 실행 실패도 불일치로 처리합니다.
pub async fn verify_password_blocking(stored_hash: String, candidate: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&stored_hash, &candidate))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Password verification task failed");
            false
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "TestPassword123!";
        let hash = hash_password(password).unwrap();

        // 해시 형식 확인 (argon2id)
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password(&hash, password));
        assert!(!verify_password(&hash, "WrongPassword123!"));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);

        assert!(verify_password(&hash1, "Password1"));
        assert!(verify_password(&hash2, "Password1"));
    }

    #[test]
    fn test_invalid_hash_fails_closed() {
        assert!(!verify_password("not-a-valid-hash", "password"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_bcrypt_style_hash_is_rejected() {
        // 다른 알고리즘의 해시는 검증되지 않음
        let bcrypt = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
        assert!(!verify_password(bcrypt, "password"));
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글패스워드123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(&hash, password));
    }

    #[test]
    fn test_dummy_hash_costs_like_a_real_one() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        let dummy = argon2::Params::try_from(&parsed).unwrap();
        let default = argon2::Params::default();

        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        assert_eq!(dummy.m_cost(), default.m_cost());
        assert_eq!(dummy.t_cost(), default.t_cost());
        assert_eq!(dummy.p_cost(), default.p_cost());

        assert!(!verify_password(DUMMY_PASSWORD_HASH, ""));
        assert!(!verify_password(DUMMY_PASSWORD_HASH, "password"));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hash = hash_password_blocking("off-the-runtime".to_string())
            .await
            .unwrap();

        assert!(verify_password_blocking(hash.clone(), "off-the-runtime".to_string()).await);
        assert!(!verify_password_blocking(hash, "wrong".to_string()).await);
        assert!(!verify_password_blocking(DUMMY_PASSWORD_HASH.to_string(), "x".to_string()).await);
    }

    proptest! {
        // Argon2 해싱 비용 때문에 케이스 수 제한
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_only_original_password_verifies(password in "\\PC{1,32}", other in "\\PC{1,32}") {
            let hash = hash_password(&password).unwrap();
            prop_assert!(verify_password(&hash, &password));
            if other != password {
                prop_assert!(!verify_password(&hash, &other));
            }
        }
    }
}
