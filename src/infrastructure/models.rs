use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::sale::{NewSale, PaymentMethod, SaleItemInput, SaleItemView, SaleView};
use crate::schema::{sale_items, sales};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleRow {
    pub id: i64,
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales)]
pub struct NewSaleRow {
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: String,
}

/// Full overwrite of a sale's scalar fields; a missing discount clears the
/// column instead of leaving the old value in place.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = sales)]
#[diesel(treat_none_as_null = true)]
pub struct SaleChangeset {
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = sale_items)]
#[diesel(belongs_to(SaleRow, foreign_key = sale_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleItemRow {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sale_items)]
pub struct NewSaleItemRow {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

// ── Row <-> domain mapping ───────────────────────────────────────────────────

impl From<&NewSale> for NewSaleRow {
    fn from(sale: &NewSale) -> Self {
        Self {
            customer_id: sale.customer_id,
            employee_id: sale.employee_id,
            sale_date: sale.sale_date,
            discount: sale.discount.clone(),
            payment_method: sale.payment_method.code().to_string(),
        }
    }
}

impl SaleChangeset {
    pub fn overwrite_with(sale: &NewSale) -> Self {
        Self {
            customer_id: sale.customer_id,
            employee_id: sale.employee_id,
            sale_date: sale.sale_date,
            discount: sale.discount.clone(),
            payment_method: sale.payment_method.code().to_string(),
            updated_at: Utc::now(),
        }
    }
}

impl NewSaleItemRow {
    pub fn for_sale(sale_id: i64, item: &SaleItemInput) -> Self {
        Self {
            sale_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
        }
    }
}

impl From<SaleItemRow> for SaleItemView {
    fn from(row: SaleItemRow) -> Self {
        Self {
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

impl SaleRow {
    pub fn into_view(self, items: Vec<SaleItemRow>) -> Result<SaleView, DomainError> {
        let payment_method: PaymentMethod = self.payment_method.parse().map_err(|_| {
            DomainError::Internal(format!(
                "sale {} has unknown payment method '{}'",
                self.id, self.payment_method
            ))
        })?;
        Ok(SaleView {
            id: self.id,
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            sale_date: self.sale_date,
            discount: self.discount,
            payment_method,
            items: items.into_iter().map(SaleItemView::from).collect(),
        })
    }
}
