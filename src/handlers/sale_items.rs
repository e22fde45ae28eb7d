use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::sale::SaleItemView;
use crate::errors::AppError;
use crate::openapi::ErrorResponse;
use crate::SaleManager;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: String,
}

impl From<SaleItemView> for SaleItemResponse {
    fn from(item: SaleItemView) -> Self {
        Self {
            id: item.id,
            sale_id: item.sale_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_plain_string(),
        }
    }
}

fn items_response(items: Vec<SaleItemView>) -> HttpResponse {
    let body: Vec<SaleItemResponse> = items.into_iter().map(SaleItemResponse::from).collect();
    HttpResponse::Ok().json(body)
}

/// GET /api/sale-items
#[utoipa::path(
    get,
    path = "/api/sale-items",
    responses(
        (status = 200, description = "Every sale item, ordered by id", body = Vec<SaleItemResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sale-items"
)]
pub async fn list_all_sale_items(service: web::Data<SaleManager>) -> Result<HttpResponse, AppError> {
    let items = blocking(service, |svc| svc.list_all_sale_items()).await?;
    Ok(items_response(items))
}

/// GET /api/sales/{id}/items
#[utoipa::path(
    get,
    path = "/api/sales/{id}/items",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Items of the sale in insertion order", body = Vec<SaleItemResponse>),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sale-items"
)]
pub async fn list_sale_items(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let sale_id = path.into_inner();
    let items = blocking(service, move |svc| svc.list_sale_items(sale_id)).await?;
    Ok(items_response(items))
}

/// GET /api/sale-items/{id}
#[utoipa::path(
    get,
    path = "/api/sale-items/{id}",
    params(("id" = i64, Path, description = "Sale item id")),
    responses(
        (status = 200, description = "Sale item found", body = SaleItemResponse),
        (status = 404, description = "Sale item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sale-items"
)]
pub async fn get_sale_item(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item = blocking(service, move |svc| svc.get_sale_item(id)).await?;
    Ok(HttpResponse::Ok().json(SaleItemResponse::from(item)))
}

/// GET /api/sale-items/product/{productId}
#[utoipa::path(
    get,
    path = "/api/sale-items/product/{productId}",
    params(("productId" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Every sale item of the product", body = Vec<SaleItemResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sale-items"
)]
pub async fn list_sale_items_by_product(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let items = blocking(service, move |svc| svc.list_sale_items_by_product(product_id)).await?;
    Ok(items_response(items))
}
