use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: OffsetDateTime,
}

/// Order joined with its product, the shape every read returns. The product
/// is denormalized so responses can price the order without a second query.
#[derive(Debug, Clone, FromRow)]
pub struct OrderWithProduct {
    pub id: Uuid,
    pub quantity: i32,
    pub created_at: OffsetDateTime,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: f64,
}

impl OrderWithProduct {
    pub fn total_cost(&self) -> f64 {
        self.quantity as f64 * self.product_price
    }
}

const WITH_PRODUCT: &str = r#"
    SELECT o.id, o.quantity, o.created_at,
           p.id AS product_id, p.name AS product_name, p.price AS product_price
    FROM orders o
    JOIN products p ON p.id = o.product_id
"#;

impl Order {
    pub async fn list_with_product(db: &PgPool) -> Result<Vec<OrderWithProduct>, sqlx::Error> {
        sqlx::query_as::<_, OrderWithProduct>(&format!("{WITH_PRODUCT} ORDER BY o.created_at ASC"))
            .fetch_all(db)
            .await
    }

    pub async fn find_with_product(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<OrderWithProduct>, sqlx::Error> {
        sqlx::query_as::<_, OrderWithProduct>(&format!("{WITH_PRODUCT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (product_id, quantity)
            VALUES ($1, $2)
            RETURNING id, product_id, quantity, created_at
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        product_id: Option<Uuid>,
        quantity: Option<i32>,
    ) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET product_id = COALESCE($2, product_id), quantity = COALESCE($3, quantity)
            WHERE id = $1
            RETURNING id, product_id, quantity, created_at
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            DELETE FROM orders
            WHERE id = $1
            RETURNING id, product_id, quantity, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(quantity: i32, price: f64) -> OrderWithProduct {
        OrderWithProduct {
            id: Uuid::new_v4(),
            quantity,
            created_at: OffsetDateTime::now_utc(),
            product_id: Uuid::new_v4(),
            product_name: "Mug".into(),
            product_price: price,
        }
    }

    #[test]
    fn total_cost_is_quantity_times_price() {
        assert_eq!(order(3, 9.5).total_cost(), 28.5);
        assert_eq!(order(1, 0.0).total_cost(), 0.0);
    }
}
