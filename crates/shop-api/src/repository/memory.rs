//! 인메모리 저장소.
//!
//! `database.url`이 설정되지 않은 개발 환경과 테스트에서 사용합니다.
//! 사용자 이름과 상품 제목의 유일성은 PostgreSQL 스키마와 같게 강제합니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use shop_core::{NewUser, Product, ShopError, ShopResult, User};
use tokio::sync::RwLock;

use super::Storage;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    products: BTreeMap<i32, Product>,
    next_user_id: i32,
    next_product_id: i32,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.products
            .values()
            .any(|p| p.title == title && Some(p.id) != except)
    }
}

/// 프로세스 메모리에 데이터를 보관하는 저장소.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> bool {
        true
    }

    async fn create_user(&self, user: NewUser) -> ShopResult<User> {
        user.validate()?;
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, None) {
            return Err(ShopError::unique_violation(Some("users_username_key")));
        }

        tables.next_user_id += 1;
        let user = user.into_user(tables.next_user_id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> ShopResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user_by_id(&self, id: i32) -> ShopResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> ShopResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_user(&self, user: &User) -> ShopResult<bool> {
        user.validate()?;
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Ok(false);
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(ShopError::unique_violation(Some("users_username_key")));
        }

        tables.users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete_user(&self, id: i32) -> ShopResult<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn create_product(&self, mut product: Product) -> ShopResult<Product> {
        product.validate()?;
        let mut tables = self.tables.write().await;
        if tables.title_taken(&product.title, None) {
            return Err(ShopError::unique_violation(Some("products_title_key")));
        }

        tables.next_product_id += 1;
        product.id = tables.next_product_id;
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn list_products_by_type(&self, product_type: &str) -> ShopResult<Vec<Product>> {
        Ok(self
            .tables
            .read()
            .await
            .products
            .values()
            .filter(|p| p.product_type == product_type)
            .cloned()
            .collect())
    }

    async fn find_product_by_id(&self, id: i32) -> ShopResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_product_by_title(&self, title: &str) -> ShopResult<Option<Product>> {
        Ok(self
            .tables
            .read()
            .await
            .products
            .values()
            .find(|p| p.title == title)
            .cloned())
    }

    async fn update_product(&self, product: &Product) -> ShopResult<bool> {
        product.validate()?;
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product.id) {
            return Ok(false);
        }
        if tables.title_taken(&product.title, Some(product.id)) {
            return Err(ShopError::unique_violation(Some("products_title_key")));
        }

        tables.products.insert(product.id, product.clone());
        Ok(true)
    }

    async fn delete_product(&self, id: i32) -> ShopResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shop_core::{PRODUCT_TYPE_TRACKSUIT, PRODUCT_TYPE_WINDBREAKER};

    fn new_user(name: &str, level: i32) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
            level,
        }
    }

    fn product(title: &str, product_type: &str) -> Product {
        Product {
            id: 0,
            product_type: product_type.to_string(),
            title: title.to_string(),
            description: String::new(),
            price: dec!(10.00),
            gender: String::new(),
            color: String::new(),
            small: 1,
            medium: 1,
            large: 1,
            image_url: String::new(),
            image_alt: String::new(),
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();

        let alice = store.create_user(new_user("alice", 0)).await.unwrap();
        let bob = store.create_user(new_user("bob", 2)).await.unwrap();
        assert_ne!(alice.id, bob.id);

        let found = store.find_user_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found.id, bob.id);

        let mut promoted = bob.clone();
        promoted.level = 1;
        assert!(store.update_user(&promoted).await.unwrap());
        assert_eq!(store.find_user_by_id(bob.id).await.unwrap().unwrap().level, 1);

        assert!(store.delete_user(alice.id).await.unwrap());
        assert!(!store.delete_user(alice.id).await.unwrap());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflict() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice", 0)).await.unwrap();

        let result = store.create_user(new_user("alice", 1)).await;
        assert!(matches!(result, Err(ShopError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let store = MemoryStore::new();
        let ghost = new_user("ghost", 1).into_user(99);
        assert!(!store.update_user(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_queries() {
        let store = MemoryStore::new();
        store
            .create_product(product("classic tracksuit", PRODUCT_TYPE_TRACKSUIT))
            .await
            .unwrap();
        let shell = store
            .create_product(product("rain shell", PRODUCT_TYPE_WINDBREAKER))
            .await
            .unwrap();

        let windbreakers = store
            .list_products_by_type(PRODUCT_TYPE_WINDBREAKER)
            .await
            .unwrap();
        assert_eq!(windbreakers.len(), 1);
        assert_eq!(windbreakers[0].id, shell.id);

        let by_title = store.find_product_by_title("rain shell").await.unwrap();
        assert_eq!(by_title.map(|p| p.id), Some(shell.id));

        assert!(store.delete_product(shell.id).await.unwrap());
        assert!(store.find_product_by_id(shell.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_product_rejected() {
        let store = MemoryStore::new();
        let mut bad = product("bad", PRODUCT_TYPE_TRACKSUIT);
        bad.price = dec!(-5);

        assert!(matches!(
            store.create_product(bad).await,
            Err(ShopError::InvalidInput(_))
        ));
    }
}
