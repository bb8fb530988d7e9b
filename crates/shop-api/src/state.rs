//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 서명 시크릿은 생성 시점에 한 번 주입되며 이후 변경되지 않습니다.

use chrono::Duration;
use secrecy::SecretString;
use shop_core::{AppConfig, CookieConfig, ShopResult};

use crate::auth::{AccessGate, TokenIssuer, TokenVerifier};
use crate::repository::SharedStorage;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 사용자/상품 저장소 (PostgreSQL 또는 인메모리)
    pub store: SharedStorage,

    /// 로그인 성공 시 토큰 발급
    pub issuer: TokenIssuer,

    /// 보호된 라우트의 토큰 검증
    pub verifier: TokenVerifier,

    /// 인증 쿠키 속성
    pub cookie: CookieConfig,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    ///
    /// * `store` - 저장소 구현
    /// * `secret` - 토큰 서명 시크릿
    /// * `token_ttl` - 토큰 및 쿠키 유효 시간
    /// * `cookie` - 인증 쿠키 설정
    pub fn new(
        store: SharedStorage,
        secret: &SecretString,
        token_ttl: Duration,
        cookie: CookieConfig,
    ) -> Self {
        Self {
            store,
            issuer: TokenIssuer::new(secret, token_ttl),
            verifier: TokenVerifier::new(secret),
            cookie,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 로드된 설정으로 AppState 생성.
    ///
    /// # Errors
    /// 서명 시크릿이 없거나 비어 있으면 설정 에러를 반환합니다.
    pub fn from_config(store: SharedStorage, config: &AppConfig) -> ShopResult<Self> {
        let secret = config.auth.signing_secret()?;
        Ok(Self::new(
            store,
            &secret,
            Duration::minutes(config.auth.token_ttl_minutes),
            config.cookie.clone(),
        ))
    }

    /// 현재 저장소와 검증기로 접근 게이트 생성.
    pub fn access_gate(&self) -> AccessGate {
        AccessGate::new(self.store.clone(), self.verifier.clone())
    }

    /// 인증 쿠키의 Max-Age (초).
    pub fn token_max_age_secs(&self) -> i64 {
        self.issuer.ttl().num_seconds()
    }

    /// 서버 가동 시간 (초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 저장소 연결 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.store.ping().await
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 고정된 시크릿과 기본 쿠키 설정을 사용합니다.
#[cfg(test)]
pub fn create_test_state(store: SharedStorage) -> AppState {
    let secret = SecretString::new("test-secret-for-unit-tests".into());
    AppState::new(store, &secret, Duration::hours(1), CookieConfig::default())
}
