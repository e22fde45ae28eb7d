use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::blocking;
use super::sale_items::SaleItemResponse;
use crate::domain::sale::{SaleInput, SaleItemInput, SaleView};
use crate::errors::AppError;
use crate::openapi::ErrorResponse;
use crate::SaleManager;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "29.99"
    #[schema(example = "29.99")]
    pub unit_price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub customer_id: i64,
    pub employee_id: i64,
    /// Must not be in the future. A timestamp without an offset is read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub sale_date: DateTime<Utc>,
    /// Optional decimal string; must not exceed the items subtotal.
    #[serde(default)]
    #[schema(example = "10.00")]
    pub discount: Option<String>,
    /// One of CREDIT_CARD, BANK_SLIP, PIX.
    #[serde(default)]
    #[schema(example = "PIX")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: i64,
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: String,
    pub discount: Option<String>,
    pub payment_method: String,
    /// max(0, Σ(unitPrice × quantity) − discount), computed on every read.
    pub total_value: String,
    pub items: Vec<SaleItemResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    /// Inclusive lower bound (RFC 3339; no offset means UTC).
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: DateTime<Utc>,
    /// Inclusive upper bound (RFC 3339; no offset means UTC).
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_date: DateTime<Utc>,
}

/// Accepts RFC 3339 and also a bare `YYYY-MM-DDTHH:MM:SS[.fff]`, read as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
        .map_err(|_| {
            format!(
                "invalid timestamp '{}', expected e.g. 2024-05-01T10:00:00Z",
                raw
            )
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_decimal(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, raw, e)))
}

impl SaleRequest {
    fn into_input(self) -> Result<SaleInput, AppError> {
        let discount = self
            .discount
            .as_deref()
            .map(|raw| parse_decimal("discount", raw))
            .transpose()?;

        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(SaleItemInput {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: parse_decimal("unitPrice", &item.unit_price)?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(SaleInput {
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            sale_date: self.sale_date,
            discount,
            payment_method: self.payment_method,
            items,
        })
    }
}

impl From<SaleView> for SaleResponse {
    fn from(sale: SaleView) -> Self {
        let total_value = sale.total_value().to_plain_string();
        Self {
            id: sale.id,
            customer_id: sale.customer_id,
            employee_id: sale.employee_id,
            sale_date: sale.sale_date.to_rfc3339(),
            discount: sale.discount.map(|d| d.to_plain_string()),
            payment_method: sale.payment_method.code().to_string(),
            total_value,
            items: sale.items.into_iter().map(SaleItemResponse::from).collect(),
        }
    }
}

fn sales_response(sales: Vec<SaleView>) -> HttpResponse {
    let body: Vec<SaleResponse> = sales.into_iter().map(SaleResponse::from).collect();
    HttpResponse::Ok().json(body)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    responses(
        (status = 200, description = "All sales, newest first", body = Vec<SaleResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn list_sales(service: web::Data<SaleManager>) -> Result<HttpResponse, AppError> {
    let sales = blocking(service, |svc| svc.list_sales()).await?;
    Ok(sales_response(sales))
}

/// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale found", body = SaleResponse),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn get_sale(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let sale = blocking(service, move |svc| svc.get_sale(id)).await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// GET /api/sales/customer/{customerId}
#[utoipa::path(
    get,
    path = "/api/sales/customer/{customerId}",
    params(("customerId" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Sales of the customer", body = Vec<SaleResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn list_sales_by_customer(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let sales = blocking(service, move |svc| svc.list_sales_by_customer(customer_id)).await?;
    Ok(sales_response(sales))
}

/// GET /api/sales/employee/{employeeId}
#[utoipa::path(
    get,
    path = "/api/sales/employee/{employeeId}",
    params(("employeeId" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Sales made by the employee", body = Vec<SaleResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn list_sales_by_employee(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let sales = blocking(service, move |svc| svc.list_sales_by_employee(employee_id)).await?;
    Ok(sales_response(sales))
}

/// GET /api/sales/date-range?startDate=..&endDate=..
#[utoipa::path(
    get,
    path = "/api/sales/date-range",
    params(DateRangeParams),
    responses(
        (status = 200, description = "Sales within the range", body = Vec<SaleResponse>),
        (status = 400, description = "Missing or inverted bounds", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn list_sales_by_date_range(
    service: web::Data<SaleManager>,
    query: web::Query<DateRangeParams>,
) -> Result<HttpResponse, AppError> {
    let DateRangeParams {
        start_date,
        end_date,
    } = query.into_inner();
    let sales = blocking(service, move |svc| {
        svc.list_sales_by_date_range(start_date, end_date)
    })
    .await?;
    Ok(sales_response(sales))
}

/// POST /api/sales
///
/// Validates the sale and writes it together with its items in a single
/// database transaction.
#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = SaleRequest,
    responses(
        (status = 201, description = "Sale created", body = SaleResponse),
        (status = 400, description = "A validation rule was violated", body = ErrorResponse),
        (status = 404, description = "Customer, employee or product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn create_sale(
    service: web::Data<SaleManager>,
    body: web::Json<SaleRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;
    let sale = blocking(service, move |svc| svc.create_sale(input)).await?;
    Ok(HttpResponse::Created().json(SaleResponse::from(sale)))
}

/// PUT /api/sales/{id}
///
/// Overwrites the sale and replaces all of its items.
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    request_body = SaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = SaleResponse),
        (status = 400, description = "A validation rule was violated", body = ErrorResponse),
        (status = 404, description = "Sale, customer, employee or product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn update_sale(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
    body: web::Json<SaleRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;
    let sale = blocking(service, move |svc| svc.update_sale(id, input)).await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 204, description = "Sale and its items deleted"),
        (status = 404, description = "Sale not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn delete_sale(
    service: web::Data<SaleManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(service, move |svc| svc.delete_sale(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
