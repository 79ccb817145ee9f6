use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub image_path: String,
    pub created_at: OffsetDateTime,
}

impl Product {
    pub async fn list(db: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image_path, created_at
            FROM products
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image_path, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        price: f64,
        image_path: &str,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, image_path)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, image_path, created_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(image_path)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        price: Option<f64>,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name), price = COALESCE($3, price)
            WHERE id = $1
            RETURNING id, name, price, image_path, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .fetch_optional(db)
        .await
    }

    /// Delete and hand back the removed row so the caller can clean up the
    /// stored image.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, price, image_path, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
