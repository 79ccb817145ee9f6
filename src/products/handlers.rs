use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bytes::Bytes;
use serde_json::json;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::dto::{
    CreatedProduct, CreatedProductResponse, DeletedProductResponse, ProductDetail,
    ProductDetailResponse, ProductListItem, ProductListResponse, UpdateProductRequest,
    UpdatedProductResponse,
};
use super::repo::Product;
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::hint::RequestHint;
use crate::state::AppState;
use crate::storage::ext_from_mime;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).patch(update_product))
        .route("/products/:id", delete(delete_product))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
}

#[instrument(skip_all)]
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = Product::list(&state.db).await?;
    let products: Vec<ProductListItem> = products
        .into_iter()
        .map(|p| ProductListItem {
            product_image: state.config.url(&p.image_path),
            request: RequestHint::get(state.config.url(&format!("products/{}", p.id))),
            id: p.id,
            name: p.name,
            price: p.price,
        })
        .collect();
    Ok(Json(ProductListResponse {
        count: products.len(),
        products,
    }))
}

#[instrument(skip_all)]
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let product = Product::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;
    Ok(Json(ProductDetailResponse {
        product: ProductDetail {
            id: product.id,
            name: product.name,
            price: product.price,
        },
        request: RequestHint::get(state.config.url("products/")),
    }))
}

struct NewProduct {
    name: String,
    price: f64,
    image: Bytes,
    image_ext: &'static str,
}

/// Pull `name`, `price` and the `productImage` file out of the multipart
/// body. Anything other than a jpeg or png image is rejected outright.
async fn read_product_form(mut mp: Multipart) -> Result<NewProduct, ApiError> {
    let mut name: Option<String> = None;
    let mut price: Option<f64> = None;
    let mut image: Option<(Bytes, &'static str)> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            Some("price") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                price = Some(
                    raw.parse::<f64>()
                        .map_err(|_| ApiError::Validation("Invalid price".into()))?,
                );
            }
            Some("productImage") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let Some(ext) = ext_from_mime(&content_type) else {
                    warn!(%content_type, "rejected upload content type");
                    return Err(ApiError::Validation(
                        "productImage must be a jpeg or png image".into(),
                    ));
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                image = Some((bytes, ext));
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Missing name in request body".into()))?;
    let price = price.ok_or_else(|| ApiError::Validation("Missing price in request body".into()))?;
    let (image, image_ext) =
        image.ok_or_else(|| ApiError::Validation("Missing productImage in request body".into()))?;

    Ok(NewProduct {
        name,
        price,
        image,
        image_ext,
    })
}

#[instrument(skip_all)]
async fn create_product(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<CreatedProductResponse>), ApiError> {
    let form = read_product_form(mp).await?;

    let key = format!("{}.{}", Uuid::new_v4(), form.image_ext);
    state.storage.put_object(&key, form.image).await?;
    let image_path = format!("uploads/{key}");

    let product = Product::create(&state.db, &form.name, form.price, &image_path).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedProductResponse {
            message: "Product created successfully",
            created_product: CreatedProduct {
                request: RequestHint::get(state.config.url(&format!("products/{}", product.id))),
                id: product.id,
                name: product.name,
                price: product.price,
            },
        }),
    ))
}

#[instrument(skip_all)]
async fn update_product(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<UpdatedProductResponse>, ApiError> {
    let product = Product::update(&state.db, id, payload.name.as_deref(), payload.price)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;
    Ok(Json(UpdatedProductResponse {
        message: "Updated Done",
        updated_product: ProductDetail {
            id: product.id,
            name: product.name,
            price: product.price,
        },
        request: RequestHint::get(state.config.url(&format!("products/{id}"))),
    }))
}

#[instrument(skip_all)]
async fn delete_product(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedProductResponse>, ApiError> {
    let product = Product::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    // Best effort: the row is gone either way, a stale file only wastes disk.
    if let Some(key) = product.image_path.strip_prefix("uploads/") {
        if let Err(e) = state.storage.delete_object(key).await {
            warn!(error = %e, key, "failed to remove product image");
        }
    }

    Ok(Json(DeletedProductResponse {
        message: "Product deleted successfully",
        request: RequestHint::post(
            state.config.url("products/"),
            json!({ "name": "String", "price": "Number" }),
        ),
    }))
}
