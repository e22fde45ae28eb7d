use diesel::dsl::exists;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CustomerLookup, EmployeeLookup, ProductLookup};
use crate::schema::{customers, employees, products};

/// Existence checks against the customer, employee and product tables.
#[derive(Clone)]
pub struct DieselReferenceLookup {
    pool: DbPool,
}

impl DieselReferenceLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerLookup for DieselReferenceLookup {
    fn customer_exists(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(exists(customers::table.find(id))).get_result(&mut conn)?)
    }
}

impl EmployeeLookup for DieselReferenceLookup {
    fn employee_exists(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(exists(employees::table.find(id))).get_result(&mut conn)?)
    }
}

impl ProductLookup for DieselReferenceLookup {
    fn product_exists(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(exists(products::table.find(id))).get_result(&mut conn)?)
    }
}
