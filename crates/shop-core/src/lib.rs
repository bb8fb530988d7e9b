//! # Shop Core
//!
//! 쇼핑몰 백엔드의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 사용자(Principal) 및 상품 도메인 모델
//! - 설정 관리 (`config` 크레이트 기반)
//! - 로깅 인프라 (`tracing`)
//! - 공통 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
