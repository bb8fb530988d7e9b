//! Products Repository
//!
//! 상품 테이블 관련 데이터베이스 연산을 담당합니다.

use shop_core::Product;
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str = "id, product_type, title, description, price, gender, color, \
     small, medium, large, image_url, image_alt";

/// Products Repository
pub struct ProductRepository;

impl ProductRepository {
    /// 테이블 생성 (없는 경우)
    pub async fn create_table(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                product_type TEXT NOT NULL,
                title TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                price NUMERIC(12, 2) NOT NULL,
                gender TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL DEFAULT '',
                small INTEGER NOT NULL DEFAULT 0,
                medium INTEGER NOT NULL DEFAULT 0,
                large INTEGER NOT NULL DEFAULT 0,
                image_url TEXT NOT NULL DEFAULT '',
                image_alt TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_type ON products (product_type)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// 상품 생성 (입력의 id는 무시)
    pub async fn create(pool: &PgPool, input: &Product) -> Result<Product, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO products
                (product_type, title, description, price, gender, color,
                 small, medium, large, image_url, image_alt)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(&input.product_type)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.gender)
            .bind(&input.color)
            .bind(input.small)
            .bind(input.medium)
            .bind(input.large)
            .bind(&input.image_url)
            .bind(&input.image_alt)
            .fetch_one(pool)
            .await
    }

    /// 모든 상품 조회
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// 유형별 상품 조회
    pub async fn get_by_type(
        pool: &PgPool,
        product_type: &str,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM products WHERE product_type = $1 ORDER BY id",
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(product_type)
            .fetch_all(pool)
            .await
    }

    /// ID로 상품 조회
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 제목으로 상품 조회
    pub async fn get_by_title(pool: &PgPool, title: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {} FROM products WHERE title = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// 상품 수정
    pub async fn update(pool: &PgPool, product: &Product) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET product_type = $2,
                title = $3,
                description = $4,
                price = $5,
                gender = $6,
                color = $7,
                small = $8,
                medium = $9,
                large = $10,
                image_url = $11,
                image_alt = $12
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.product_type)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.gender)
        .bind(&product.color)
        .bind(product.small)
        .bind(product.medium)
        .bind(product.large)
        .bind(&product.image_url)
        .bind(&product.image_alt)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 상품 삭제
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
