//! 쇼핑몰 운영을 위한 도메인 모델.

mod product;
mod user;

pub use product::*;
pub use user::*;
