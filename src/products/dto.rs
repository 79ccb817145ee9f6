use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hint::RequestHint;

#[derive(Debug, Serialize)]
pub struct ProductListItem {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(rename = "productImage")]
    pub product_image: String,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub count: usize,
    pub products: Vec<ProductListItem>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: ProductDetail,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProductResponse {
    pub message: &'static str,
    pub created_product: CreatedProduct,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProductResponse {
    pub message: &'static str,
    pub updated_product: ProductDetail,
    pub request: RequestHint,
}

#[derive(Debug, Serialize)]
pub struct DeletedProductResponse {
    pub message: &'static str,
    pub request: RequestHint,
}
