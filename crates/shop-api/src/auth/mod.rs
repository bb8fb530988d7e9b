//! 인증 및 권한 부여.
//!
//! 쿠키로 전달되는 서명 토큰과 레벨 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenIssuer`] / [`TokenVerifier`]: 토큰 발급 및 검증
//! - [`ResourceClass`]: 리소스 클래스별 최대 허용 레벨
//! - [`AccessGate`]: 토큰 → 사용자 조회 → 레벨 확인
//! - [`gated`]: 메서드 라우터에 게이트 미들웨어 적용
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 게이트를 통과한 핸들러는 CurrentUser를 받을 수 있음
//! async fn protected_handler(
//!     Extension(CurrentUser(user)): Extension<CurrentUser>,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod cookie;
mod gate;
mod jwt;
mod password;
mod roles;

pub use cookie::{auth_cookie, clear_auth_cookie, parse_cookie};
pub use gate::{access_gate, gated, AccessGate, CurrentUser, GateContext, GateError, DENIED_MESSAGE};
pub use jwt::{Claims, TokenError, TokenIssuer, TokenVerifier};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError, DUMMY_PASSWORD_HASH,
};
pub use roles::ResourceClass;
