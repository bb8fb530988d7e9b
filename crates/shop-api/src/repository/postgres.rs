//! PostgreSQL 저장소.

use std::time::Duration;

use async_trait::async_trait;
use shop_core::{DatabaseConfig, NewUser, Product, ShopResult, User};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::{ProductRepository, Storage, UserRepository};

/// sqlx 연결 풀 기반 저장소.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// 기존 연결 풀로 저장소를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 설정에 따라 연결 풀을 만들고 연결을 확인합니다.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> ShopResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(url)
            .await?;

        info!(max_connections = config.max_connections, "Database connected");
        Ok(Self::new(pool))
    }

    /// 테이블이 없으면 생성합니다.
    pub async fn init_schema(&self) -> ShopResult<()> {
        UserRepository::create_table(&self.pool).await?;
        ProductRepository::create_table(&self.pool).await?;
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl Storage for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn create_user(&self, user: NewUser) -> ShopResult<User> {
        user.validate()?;
        Ok(UserRepository::create(&self.pool, &user).await?)
    }

    async fn list_users(&self) -> ShopResult<Vec<User>> {
        Ok(UserRepository::get_all(&self.pool).await?)
    }

    async fn find_user_by_id(&self, id: i32) -> ShopResult<Option<User>> {
        Ok(UserRepository::get_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> ShopResult<Option<User>> {
        Ok(UserRepository::get_by_username(&self.pool, username).await?)
    }

    async fn update_user(&self, user: &User) -> ShopResult<bool> {
        user.validate()?;
        Ok(UserRepository::update(&self.pool, user).await?)
    }

    async fn delete_user(&self, id: i32) -> ShopResult<bool> {
        Ok(UserRepository::delete(&self.pool, id).await?)
    }

    async fn create_product(&self, product: Product) -> ShopResult<Product> {
        product.validate()?;
        Ok(ProductRepository::create(&self.pool, &product).await?)
    }

    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        Ok(ProductRepository::get_all(&self.pool).await?)
    }

    async fn list_products_by_type(&self, product_type: &str) -> ShopResult<Vec<Product>> {
        Ok(ProductRepository::get_by_type(&self.pool, product_type).await?)
    }

    async fn find_product_by_id(&self, id: i32) -> ShopResult<Option<Product>> {
        Ok(ProductRepository::get_by_id(&self.pool, id).await?)
    }

    async fn find_product_by_title(&self, title: &str) -> ShopResult<Option<Product>> {
        Ok(ProductRepository::get_by_title(&self.pool, title).await?)
    }

    async fn update_product(&self, product: &Product) -> ShopResult<bool> {
        product.validate()?;
        Ok(ProductRepository::update(&self.pool, product).await?)
    }

    async fn delete_product(&self, id: i32) -> ShopResult<bool> {
        Ok(ProductRepository::delete(&self.pool, id).await?)
    }
}
