use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{
    CreateOrderRequest, CreatedOrderResponse, DeletedOrderResponse, OrderDetailResponse, OrderItem,
    OrderListResponse, OrderSummary, UpdateOrderRequest, UpdatedOrderResponse,
};
use super::repo::Order;
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::hint::RequestHint;
use crate::products::repo::Product;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id", put(update_order).patch(update_order))
        .route("/orders/:id", delete(delete_order))
}

#[instrument(skip_all)]
async fn list_orders(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<OrderListResponse>, ApiError> {
    let rows = Order::list_with_product(&state.db).await?;
    let total_price: f64 = rows.iter().map(|r| r.total_cost()).sum();
    let orders: Vec<OrderItem> = rows
        .into_iter()
        .map(|row| {
            let hint = RequestHint::get(state.config.url(&format!("orders/{}", row.id)));
            OrderItem::from_row(row, hint)
        })
        .collect();
    Ok(Json(OrderListResponse {
        count: orders.len(),
        total_price,
        orders,
    }))
}

#[instrument(skip_all)]
async fn create_order(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreatedOrderResponse>), ApiError> {
    if payload.quantity < 1 {
        return Err(ApiError::Validation("Quantity must be at least 1".into()));
    }
    // The FK would catch this too, but a dangling reference is the client's
    // mistake, not a server fault.
    if Product::find(&state.db, payload.product_id).await?.is_none() {
        return Err(ApiError::Validation(
            "Invalid product ID in request body".into(),
        ));
    }

    let order = Order::create(&state.db, payload.product_id, payload.quantity).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedOrderResponse {
            message: "Order created",
            created_order: OrderSummary {
                request: RequestHint::get(state.config.url(&format!("orders/{}", order.id))),
                id: order.id,
                product: order.product_id,
                quantity: order.quantity,
            },
        }),
    ))
}

#[instrument(skip_all)]
async fn get_order(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let row = Order::find_with_product(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;
    let hint = RequestHint::get(state.config.url("orders"));
    Ok(Json(OrderDetailResponse {
        order: OrderItem::from_row(row, hint),
    }))
}

#[instrument(skip_all)]
async fn update_order(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<UpdatedOrderResponse>, ApiError> {
    if let Some(quantity) = payload.quantity {
        if quantity < 1 {
            return Err(ApiError::Validation("Quantity must be at least 1".into()));
        }
    }
    if let Some(product_id) = payload.product_id {
        if Product::find(&state.db, product_id).await?.is_none() {
            return Err(ApiError::Validation(
                "Invalid product ID in request body".into(),
            ));
        }
    }

    let order = Order::update(&state.db, id, payload.product_id, payload.quantity)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;
    Ok(Json(UpdatedOrderResponse {
        message: "Order updated",
        updated_order: OrderSummary {
            request: RequestHint::get(state.config.url(&format!("orders/{}", order.id))),
            id: order.id,
            product: order.product_id,
            quantity: order.quantity,
        },
    }))
}

#[instrument(skip_all)]
async fn delete_order(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedOrderResponse>, ApiError> {
    Order::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;
    Ok(Json(DeletedOrderResponse {
        message: "Order deleted successfully",
        request: RequestHint::post(
            state.config.url("orders/"),
            json!({ "productId": "String", "quantity": "Number" }),
        ),
    }))
}
