//! Repository pattern for database operations.
//!
//! 라우트 핸들러와 인증 게이트는 [`Storage`] 트레이트만 사용합니다.
//! SQL은 테이블별 Repository(static methods 패턴)에 모아두고,
//! [`PostgresStore`]가 이를 트레이트로 노출합니다.

pub mod memory;
pub mod postgres;
pub mod products;
pub mod storage;
pub mod users;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use products::ProductRepository;
pub use storage::{SharedStorage, Storage};
pub use users::UserRepository;
