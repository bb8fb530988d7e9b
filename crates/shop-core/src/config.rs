//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → 환경 변수 순으로 설정을 병합합니다.
//! 환경 변수는 `SHOP__SECTION__KEY` 형식을 사용하며, 자주 쓰는 값에 대해서는
//! 짧은 별칭(`JWT_SECRET`, `DATABASE_URL`, `API_HOST`, `API_PORT`)도 지원합니다.
//!
//! 서명 시크릿은 프로세스 시작 시 한 번만 읽습니다. 비어 있거나 없으면
//! [`AppConfig::validate`]가 [`ShopError::Config`]를 반환하며 서버는 시작되지 않습니다.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{ShopError, ShopResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 인증 쿠키 설정
    pub cookie: CookieConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 [`ShopError::Config`]를 반환합니다.
    pub fn socket_addr(&self) -> ShopResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Config(format!("invalid listen address: {}", e)))
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열. 없으면 인메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

/// 인증 설정.
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// 토큰 서명용 HMAC 시크릿
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// 토큰 유효 시간 (분)
    pub token_ttl_minutes: i64,
    /// 시작 시 생성할 관리자 계정 이름
    #[serde(default)]
    pub bootstrap_admin_username: Option<String>,
    /// 시작 시 생성할 관리자 계정 비밀번호
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: 24 * 60,
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("bootstrap_admin_username", &self.bootstrap_admin_username)
            .field(
                "bootstrap_admin_password",
                &self.bootstrap_admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthConfig {
    /// 서명 시크릿을 `SecretString`으로 반환합니다.
    ///
    /// # Errors
    /// 시크릿이 없거나 공백뿐이면 [`ShopError::Config`].
    /// 공백이 아닌 시크릿은 앞뒤 공백을 포함해 그대로 사용합니다.
    pub fn signing_secret(&self) -> ShopResult<SecretString> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(SecretString::new(secret.into())),
            _ => Err(ShopError::Config(
                "JWT_SECRET is not set; refusing to sign tokens with an empty secret".to_string(),
            )),
        }
    }

    /// 관리자 부트스트랩 계정 (이름, 비밀번호). 둘 다 설정된 경우에만 반환합니다.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (
            self.bootstrap_admin_username.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// 인증 쿠키 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// 쿠키 이름
    pub name: String,
    /// 쿠키 도메인
    pub domain: String,
    /// `Secure` 속성 부여 여부 (HTTPS 환경)
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "token".to_string(),
            domain: "localhost".to_string(),
            secure: false,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 짧은 환경 변수 별칭 → 설정 키.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("JWT_SECRET", "auth.jwt_secret"),
    ("DATABASE_URL", "database.url"),
    ("API_HOST", "server.host"),
    ("API_PORT", "server.port"),
];

impl AppConfig {
    /// 기본 경로와 프로세스 환경 변수에서 설정을 로드하고 검증합니다.
    pub fn load() -> ShopResult<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(Some(DEFAULT_CONFIG_PATH), &env)
    }

    /// 파일(선택)과 주어진 환경 변수 맵에서 설정을 로드하고 검증합니다.
    ///
    /// 환경 변수 맵을 인자로 받으므로 테스트에서 프로세스 환경을 건드리지 않습니다.
    pub fn load_from<P: AsRef<Path>>(path: Option<P>, env: &HashMap<String, String>) -> ShopResult<Self> {
        let server = ServerConfig::default();
        let database = DatabaseConfig::default();
        let auth = AuthConfig::default();
        let cookie = CookieConfig::default();
        let logging = LoggingConfig::default();

        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", server.host)?
            .set_default("server.port", i64::from(server.port))?
            .set_default("server.request_timeout_secs", server.request_timeout_secs)?
            .set_default("database.max_connections", i64::from(database.max_connections))?
            .set_default("database.connection_timeout_secs", database.connection_timeout_secs)?
            .set_default("auth.token_ttl_minutes", auth.token_ttl_minutes)?
            .set_default("cookie.name", cookie.name)?
            .set_default("cookie.domain", cookie.domain)?
            .set_default("cookie.secure", cookie.secure)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format)?;

        // 파일에서 로드 (없어도 됨)
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }

        // 환경 변수로 오버라이드
        builder = builder.add_source(
            config::Environment::with_prefix("SHOP")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        );

        for (alias, key) in ENV_ALIASES {
            builder = builder.set_override_option(*key, env.get(*alias).cloned())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> ShopResult<()> {
        self.auth.signing_secret()?;

        if self.auth.token_ttl_minutes <= 0 {
            return Err(ShopError::Config(format!(
                "auth.token_ttl_minutes must be positive, got {}",
                self.auth.token_ttl_minutes
            )));
        }

        if self.cookie.name.is_empty() {
            return Err(ShopError::Config("cookie.name must not be empty".to_string()));
        }

        self.server.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let result = AppConfig::load_from(None::<&str>, &env(&[]));
        assert!(matches!(result, Err(ShopError::Config(_))));
    }

    #[test]
    fn test_blank_secret_is_config_error() {
        let result = AppConfig::load_from(None::<&str>, &env(&[("JWT_SECRET", "   ")]));
        assert!(matches!(result, Err(ShopError::Config(_))));
    }

    #[test]
    fn test_secret_bytes_kept_verbatim() {
        let auth = AuthConfig {
            jwt_secret: Some(" padded secret\t".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            auth.signing_secret().unwrap().expose_secret(),
            " padded secret\t"
        );
    }

    #[test]
    fn test_defaults_with_secret_alias() {
        let config = AppConfig::load_from(None::<&str>, &env(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cookie.name, "token");
        assert_eq!(config.cookie.domain, "localhost");
        assert_eq!(config.auth.token_ttl_minutes, 24 * 60);
        assert!(config.database.url.is_none());
        assert_eq!(
            config.auth.signing_secret().unwrap().expose_secret(),
            "s3cret"
        );
    }

    #[test]
    fn test_prefixed_env_overrides() {
        let config = AppConfig::load_from(
            None::<&str>,
            &env(&[
                ("SHOP__AUTH__JWT_SECRET", "prefixed"),
                ("SHOP__COOKIE__DOMAIN", "shop.example.com"),
                ("SHOP__COOKIE__SECURE", "true"),
                ("API_PORT", "8080"),
            ]),
        )
        .unwrap();

        assert_eq!(config.cookie.domain, "shop.example.com");
        assert!(config.cookie.secure);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let result = AppConfig::load_from(
            None::<&str>,
            &env(&[("JWT_SECRET", "s3cret"), ("SHOP__AUTH__TOKEN_TTL_MINUTES", "0")]),
        );
        assert!(matches!(result, Err(ShopError::Config(_))));
    }

    #[test]
    fn test_bootstrap_admin_requires_both_fields() {
        let mut auth = AuthConfig {
            bootstrap_admin_username: Some("admin".to_string()),
            ..Default::default()
        };
        assert!(auth.bootstrap_admin().is_none());

        auth.bootstrap_admin_password = Some("changeme".to_string());
        assert_eq!(auth.bootstrap_admin(), Some(("admin", "changeme")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = AuthConfig {
            jwt_secret: Some("super-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
