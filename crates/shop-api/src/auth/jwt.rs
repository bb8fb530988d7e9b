//! JWT 토큰 발급 및 검증.
//!
//! 서명 시크릿은 생성 시점에 주입되며 이후 변경되지 않습니다.
//! 검증 순서는 헤더 구조 → 알고리즘 → 서명 → 클레임 → 만료 순이며,
//! 서명이 확인되기 전에는 어떤 클레임도 읽지 않습니다.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// 발급에 사용하는 알고리즘.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// 검증 시 허용하는 HMAC 계열 알고리즘.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 현재 시각 기준으로 새로운 Claims 생성.
    pub fn new(user_id: i32, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// 토큰 수명주기 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 서명 실패: {0}")]
    Signing(String),
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("허용되지 않는 서명 알고리즘: {0}")]
    AlgorithmRejected(String),
    #[error("서명이 일치하지 않습니다")]
    SignatureInvalid,
    #[error("사용자 ID 클레임이 없거나 형식이 잘못되었습니다")]
    ClaimMissing,
    #[error("토큰이 만료되었습니다")]
    Expired,
}

impl TokenError {
    /// 감사 로그/메트릭 라벨용 짧은 이름.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Signing(_) => "signing",
            TokenError::Malformed => "malformed",
            TokenError::AlgorithmRejected(_) => "algorithm_rejected",
            TokenError::SignatureInvalid => "signature_invalid",
            TokenError::ClaimMissing => "claim_missing",
            TokenError::Expired => "expired",
        }
    }
}

/// 토큰 발급기.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// 주입된 시크릿과 유효 시간으로 발급기를 생성합니다.
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl,
        }
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 사용자 ID에 대한 서명된 토큰을 발급합니다.
    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, self.ttl);
        self.sign(&claims)
    }

    /// 주어진 Claims에 서명합니다.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// 토큰 검증기.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// 주입된 시크릿으로 검증기를 생성합니다.
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    /// 토큰을 검증하고 사용자 ID를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.verify_claims(token).map(|claims| claims.user_id)
    }

    /// 토큰을 검증하고 전체 Claims를 반환합니다.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, TokenError> {
        check_header(token)?;

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::Base64(_) => TokenError::SignatureInvalid,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingAlgorithm => TokenError::AlgorithmRejected(e.to_string()),
                ErrorKind::ExpiredSignature => TokenError::Expired,
                // 헤더는 이미 검사했으므로 여기서의 역직렬화 실패는 클레임 문제
                ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    TokenError::ClaimMissing
                }
                _ => TokenError::Malformed,
            })
    }
}

/// 헤더 구조와 알고리즘을 서명 검증 전에 확인합니다.
///
/// `none`, 비대칭 알고리즘 등 HMAC 계열이 아닌 토큰은 클레임 내용과 무관하게 거부됩니다.
fn check_header(token: &str) -> Result<(), TokenError> {
    if token.split('.').count() != 3 {
        return Err(TokenError::Malformed);
    }

    match decode_header(token) {
        Ok(header) if ACCEPTED_ALGORITHMS.contains(&header.alg) => Ok(()),
        Ok(header) => Err(TokenError::AlgorithmRejected(format!("{:?}", header.alg))),
        // jsonwebtoken이 모르는 알고리즘(`none` 등)은 헤더 파싱 자체가 실패
        Err(_) => match raw_algorithm(token) {
            Some(alg) if !is_accepted_name(&alg) => Err(TokenError::AlgorithmRejected(alg)),
            _ => Err(TokenError::Malformed),
        },
    }
}

fn raw_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("alg")?.as_str().map(str::to_string)
}

fn is_accepted_name(alg: &str) -> bool {
    matches!(alg, "HS256" | "HS384" | "HS512")
}
