use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::hint::RequestHint;
use crate::orders::repo::OrderWithProduct;

#[derive(Debug, Serialize)]
pub struct OrderProduct {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub quantity: i32,
    pub product: OrderProduct,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    pub date: OffsetDateTime,
    pub request: RequestHint,
}

impl OrderItem {
    pub fn from_row(row: OrderWithProduct, hint: RequestHint) -> Self {
        Self {
            id: row.id,
            quantity: row.quantity,
            total_cost: row.total_cost(),
            date: row.created_at,
            product: OrderProduct {
                id: row.product_id,
                name: row.product_name,
                price: row.product_price,
            },
            request: hint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub count: usize,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    pub orders: Vec<OrderItem>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderItem,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "productId")]
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(rename = "productId")]
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub product: Uuid,
    pub quantity: i32,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderResponse {
    pub message: &'static str,
    pub created_order: OrderSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedOrderResponse {
    pub message: &'static str,
    pub updated_order: OrderSummary,
}

#[derive(Debug, Serialize)]
pub struct DeletedOrderResponse {
    pub message: &'static str,
    pub request: RequestHint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_item_serializes_total_cost_in_camel_case() {
        let row = OrderWithProduct {
            id: Uuid::new_v4(),
            quantity: 2,
            created_at: OffsetDateTime::now_utc(),
            product_id: Uuid::new_v4(),
            product_name: "Mug".into(),
            product_price: 9.5,
        };
        let item = OrderItem::from_row(row, RequestHint::get("http://shop.local/orders/1".into()));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["totalCost"], 19.0);
        assert_eq!(value["product"]["price"], 9.5);
        assert!(value.get("total_cost").is_none());
    }

    #[test]
    fn create_request_defaults_quantity_to_one() {
        let body = format!(r#"{{ "productId": "{}" }}"#, Uuid::new_v4());
        let req: CreateOrderRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.quantity, 1);
    }
}
