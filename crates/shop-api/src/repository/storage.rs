//! 저장소 추상화.

use std::sync::Arc;

use async_trait::async_trait;
use shop_core::{NewUser, Product, ShopResult, User};

/// 핸들러 간 공유되는 저장소 핸들.
pub type SharedStorage = Arc<dyn Storage>;

/// 사용자/상품 저장소.
///
/// 조회 계열은 없을 때 `Ok(None)`을, 수정/삭제 계열은 영향받은 행이 있었는지를 반환합니다.
#[async_trait]
pub trait Storage: Send + Sync {
    /// 백엔드 이름 (로그/헬스 체크용).
    fn backend(&self) -> &'static str;

    /// 연결 상태 확인.
    async fn ping(&self) -> bool;

    // ==================== Users ====================

    async fn create_user(&self, user: NewUser) -> ShopResult<User>;

    async fn list_users(&self) -> ShopResult<Vec<User>>;

    async fn find_user_by_id(&self, id: i32) -> ShopResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> ShopResult<Option<User>>;

    async fn update_user(&self, user: &User) -> ShopResult<bool>;

    async fn delete_user(&self, id: i32) -> ShopResult<bool>;

    // ==================== Products ====================

    async fn create_product(&self, product: Product) -> ShopResult<Product>;

    async fn list_products(&self) -> ShopResult<Vec<Product>>;

    async fn list_products_by_type(&self, product_type: &str) -> ShopResult<Vec<Product>>;

    async fn find_product_by_id(&self, id: i32) -> ShopResult<Option<Product>>;

    async fn find_product_by_title(&self, title: &str) -> ShopResult<Option<Product>>;

    async fn update_product(&self, product: &Product) -> ShopResult<bool>;

    async fn delete_product(&self, id: i32) -> ShopResult<bool>;
}
