use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;
use crate::domain::ports::{CustomerLookup, EmployeeLookup, ProductLookup, SaleRepository};
use crate::domain::sale::{
    subtotal, NewSale, PaymentMethod, SaleInput, SaleItemView, SalePolicy, SaleView,
};

/// Validates sales and hands them to the repository as one unit of work.
pub struct SaleService<R, L> {
    repo: R,
    lookups: L,
    policy: SalePolicy,
}

impl<R, L> SaleService<R, L>
where
    R: SaleRepository,
    L: CustomerLookup + EmployeeLookup + ProductLookup,
{
    pub fn new(repo: R, lookups: L, policy: SalePolicy) -> Self {
        Self {
            repo,
            lookups,
            policy,
        }
    }

    pub fn create_sale(&self, input: SaleInput) -> Result<SaleView, DomainError> {
        let sale = self
            .validate(input, Utc::now())
            .inspect_err(|e| log::warn!("Rejected sale: {}", e))?;

        let created = self.repo.create(&sale)?;
        log::info!(
            "Created sale {} with {} item(s), total {}",
            created.id,
            created.items.len(),
            created.total_value()
        );
        Ok(created)
    }

    pub fn update_sale(&self, id: i64, input: SaleInput) -> Result<SaleView, DomainError> {
        if !self.repo.exists(id)? {
            return Err(DomainError::not_found("Sale", id));
        }

        let sale = self
            .validate(input, Utc::now())
            .inspect_err(|e| log::warn!("Rejected update of sale {}: {}", id, e))?;

        let updated = self
            .repo
            .replace(id, &sale)?
            .ok_or_else(|| DomainError::not_found("Sale", id))?;
        log::info!(
            "Updated sale {} with {} item(s), total {}",
            updated.id,
            updated.items.len(),
            updated.total_value()
        );
        Ok(updated)
    }

    pub fn delete_sale(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::not_found("Sale", id));
        }
        log::info!("Deleted sale {}", id);
        Ok(())
    }

    pub fn get_sale(&self, id: i64) -> Result<SaleView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Sale", id))
    }

    pub fn list_sales(&self) -> Result<Vec<SaleView>, DomainError> {
        self.repo.list()
    }

    pub fn list_sales_by_customer(&self, customer_id: i64) -> Result<Vec<SaleView>, DomainError> {
        self.repo.list_by_customer(customer_id)
    }

    pub fn list_sales_by_employee(&self, employee_id: i64) -> Result<Vec<SaleView>, DomainError> {
        self.repo.list_by_employee(employee_id)
    }

    pub fn list_sales_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleView>, DomainError> {
        if start > end {
            return Err(DomainError::InvalidArgument(
                "Start date must not be after end date".to_string(),
            ));
        }
        self.repo.list_by_date_range(start, end)
    }

    pub fn list_all_sale_items(&self) -> Result<Vec<SaleItemView>, DomainError> {
        self.repo.list_items()
    }

    pub fn list_sale_items(&self, sale_id: i64) -> Result<Vec<SaleItemView>, DomainError> {
        if !self.repo.exists(sale_id)? {
            return Err(DomainError::not_found("Sale", sale_id));
        }
        self.repo.list_items_by_sale(sale_id)
    }

    pub fn get_sale_item(&self, id: i64) -> Result<SaleItemView, DomainError> {
        self.repo
            .find_item(id)?
            .ok_or_else(|| DomainError::not_found("Sale item", id))
    }

    pub fn list_sale_items_by_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<SaleItemView>, DomainError> {
        self.repo.list_items_by_product(product_id)
    }

    /// Applies every rule in a fixed order and stops at the first violation.
    /// Nothing is written here.
    fn validate(&self, input: SaleInput, now: DateTime<Utc>) -> Result<NewSale, DomainError> {
        let payment_method: PaymentMethod = match input.payment_method.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(DomainError::InvalidArgument(
                    "Payment method is required".to_string(),
                ))
            }
            Some(code) => code.parse()?,
        };

        if input.sale_date > now {
            return Err(DomainError::InvalidArgument(
                "Sale date cannot be in the future".to_string(),
            ));
        }

        if self.policy.require_items && input.items.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Sale must contain at least one item".to_string(),
            ));
        }

        for (position, item) in input.items.iter().enumerate() {
            if !self.lookups.product_exists(item.product_id)? {
                return Err(DomainError::not_found("Product", item.product_id));
            }
            if item.quantity < 1 {
                return Err(DomainError::InvalidArgument(format!(
                    "Quantity must be at least 1 (item {})",
                    position + 1
                )));
            }
            if item.unit_price <= BigDecimal::zero() {
                return Err(DomainError::InvalidArgument(format!(
                    "Unit price must be a positive value (item {})",
                    position + 1
                )));
            }
        }

        if !self.lookups.customer_exists(input.customer_id)? {
            return Err(DomainError::not_found("Customer", input.customer_id));
        }
        if !self.lookups.employee_exists(input.employee_id)? {
            return Err(DomainError::not_found("Employee", input.employee_id));
        }

        if let Some(discount) = &input.discount {
            if *discount < BigDecimal::zero() {
                return Err(DomainError::InvalidArgument(
                    "Discount must not be negative".to_string(),
                ));
            }
            let subtotal = subtotal(&input.items);
            if *discount > subtotal {
                return Err(DomainError::InvalidArgument(format!(
                    "Discount exceeds total: discount {} is greater than items subtotal {}",
                    discount, subtotal
                )));
            }
        }

        Ok(NewSale {
            customer_id: input.customer_id,
            employee_id: input.employee_id,
            sale_date: input.sale_date,
            discount: input.discount,
            payment_method,
            items: input.items,
        })
    }
}
