//! Users Repository
//!
//! 사용자 테이블 관련 데이터베이스 연산을 담당합니다.

use shop_core::{NewUser, User};
use sqlx::PgPool;

/// Users Repository
pub struct UserRepository;

impl UserRepository {
    /// 테이블 생성 (없는 경우)
    pub async fn create_table(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                level INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// 사용자 생성
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, level)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, level
            "#,
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.level)
        .fetch_one(pool)
        .await
    }

    /// 모든 사용자 조회
    pub async fn get_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, level FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// ID로 사용자 조회
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, level FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 이름으로 사용자 조회
    pub async fn get_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, level FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// 사용자 수정
    pub async fn update(pool: &PgPool, user: &User) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, level = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.level)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 사용자 삭제
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
