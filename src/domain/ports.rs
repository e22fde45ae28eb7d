use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::sale::{NewSale, SaleItemView, SaleView};

/// Persistence for sales and their items.
///
/// Every write method runs in a single transaction: either the sale and all
/// of its items are committed, or nothing is.
pub trait SaleRepository: Send + Sync + 'static {
    fn create(&self, sale: &NewSale) -> Result<SaleView, DomainError>;
    /// Deletes every item of sale `id`, overwrites its fields and inserts the
    /// new items. `None` when the sale does not exist.
    fn replace(&self, id: i64, sale: &NewSale) -> Result<Option<SaleView>, DomainError>;
    /// Deletes the items, then the sale. `false` when the sale does not exist.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;

    fn exists(&self, id: i64) -> Result<bool, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<SaleView>, DomainError>;
    fn list(&self) -> Result<Vec<SaleView>, DomainError>;
    fn list_by_customer(&self, customer_id: i64) -> Result<Vec<SaleView>, DomainError>;
    fn list_by_employee(&self, employee_id: i64) -> Result<Vec<SaleView>, DomainError>;
    fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleView>, DomainError>;

    /// Every sale item, ordered by id.
    fn list_items(&self) -> Result<Vec<SaleItemView>, DomainError>;
    fn list_items_by_sale(&self, sale_id: i64) -> Result<Vec<SaleItemView>, DomainError>;
    fn find_item(&self, id: i64) -> Result<Option<SaleItemView>, DomainError>;
    fn list_items_by_product(&self, product_id: i64) -> Result<Vec<SaleItemView>, DomainError>;
}

pub trait CustomerLookup: Send + Sync + 'static {
    fn customer_exists(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait EmployeeLookup: Send + Sync + 'static {
    fn employee_exists(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait ProductLookup: Send + Sync + 'static {
    fn product_exists(&self, id: i64) -> Result<bool, DomainError>;
}
