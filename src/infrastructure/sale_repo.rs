use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::SaleRepository;
use crate::domain::sale::{NewSale, SaleItemInput, SaleItemView, SaleView};
use crate::schema::{sale_items, sales};

use super::models::{NewSaleItemRow, NewSaleRow, SaleChangeset, SaleItemRow, SaleRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            // A referenced row removed between validation and the write.
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::NotFound(missing_reference(info.constraint_name()))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

fn missing_reference(constraint: Option<&str>) -> String {
    let entity = match constraint {
        Some("sales_customer_id_fkey") => "Customer",
        Some("sales_employee_id_fkey") => "Employee",
        Some("sale_items_product_id_fkey") => "Product",
        Some("sale_items_sale_id_fkey") => "Sale",
        _ => return "A record referenced by the sale does not exist".to_string(),
    };
    format!("{} referenced by the sale does not exist", entity)
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Query helpers ─────────────────────────────────────────────────────────────

enum SaleFilter {
    All,
    Customer(i64),
    Employee(i64),
    DateRange(DateTime<Utc>, DateTime<Utc>),
}

/// Loads the items of every sale in `rows` with one query and assembles views
/// in the same order as `rows`.
fn with_items(conn: &mut PgConnection, rows: Vec<SaleRow>) -> Result<Vec<SaleView>, DomainError> {
    let items = SaleItemRow::belonging_to(&rows)
        .select(SaleItemRow::as_select())
        .order(sale_items::id.asc())
        .load(conn)?;

    items
        .grouped_by(&rows)
        .into_iter()
        .zip(rows)
        .map(|(items, sale)| sale.into_view(items))
        .collect()
}

fn insert_items(
    conn: &mut PgConnection,
    sale_id: i64,
    items: &[SaleItemInput],
) -> Result<Vec<SaleItemRow>, DomainError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let new_items: Vec<NewSaleItemRow> = items
        .iter()
        .map(|item| NewSaleItemRow::for_sale(sale_id, item))
        .collect();
    let mut inserted = diesel::insert_into(sale_items::table)
        .values(&new_items)
        .returning(SaleItemRow::as_returning())
        .get_results(conn)?;
    inserted.sort_by_key(|item: &SaleItemRow| item.id);
    Ok(inserted)
}

/// Locks the sale row for the rest of the transaction. `false` if absent.
fn lock_sale(conn: &mut PgConnection, id: i64) -> Result<bool, DomainError> {
    let found = sales::table
        .find(id)
        .select(sales::id)
        .for_update()
        .first::<i64>(conn)
        .optional()?;
    Ok(found.is_some())
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselSaleRepository {
    pool: DbPool,
}

impl DieselSaleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Runs `f` in a read-only repeatable-read transaction so a sale and its
    /// items come from the same snapshot.
    fn read<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, DomainError>,
    {
        let mut conn = self.pool.get()?;
        conn.build_transaction().read_only().repeatable_read().run(f)
    }

    fn list_where(&self, filter: SaleFilter) -> Result<Vec<SaleView>, DomainError> {
        self.read(|conn| {
            let query = sales::table.select(SaleRow::as_select()).into_boxed();
            let query = match filter {
                SaleFilter::All => query,
                SaleFilter::Customer(id) => query.filter(sales::customer_id.eq(id)),
                SaleFilter::Employee(id) => query.filter(sales::employee_id.eq(id)),
                SaleFilter::DateRange(start, end) => {
                    query.filter(sales::sale_date.between(start, end))
                }
            };
            let rows = query
                .order((sales::sale_date.desc(), sales::id.desc()))
                .load(conn)?;
            with_items(conn, rows)
        })
    }
}

impl SaleRepository for DieselSaleRepository {
    fn create(&self, sale: &NewSale) -> Result<SaleView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::insert_into(sales::table)
                .values(&NewSaleRow::from(sale))
                .returning(SaleRow::as_returning())
                .get_result(conn)?;

            let items = insert_items(conn, row.id, &sale.items)?;
            row.into_view(items)
        })
    }

    fn replace(&self, id: i64, sale: &NewSale) -> Result<Option<SaleView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if !lock_sale(conn, id)? {
                return Ok(None);
            }

            diesel::delete(sale_items::table.filter(sale_items::sale_id.eq(id))).execute(conn)?;

            let row = diesel::update(sales::table.find(id))
                .set(&SaleChangeset::overwrite_with(sale))
                .returning(SaleRow::as_returning())
                .get_result(conn)?;

            let items = insert_items(conn, id, &sale.items)?;
            row.into_view(items).map(Some)
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if !lock_sale(conn, id)? {
                return Ok(false);
            }

            diesel::delete(sale_items::table.filter(sale_items::sale_id.eq(id))).execute(conn)?;
            diesel::delete(sales::table.find(id)).execute(conn)?;
            Ok(true)
        })
    }

    fn exists(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(exists(sales::table.find(id))).get_result(&mut conn)?)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<SaleView>, DomainError> {
        self.read(|conn| {
            let row = sales::table
                .find(id)
                .select(SaleRow::as_select())
                .first(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };
            Ok(with_items(conn, vec![row])?.pop())
        })
    }

    fn list(&self) -> Result<Vec<SaleView>, DomainError> {
        self.list_where(SaleFilter::All)
    }

    fn list_by_customer(&self, customer_id: i64) -> Result<Vec<SaleView>, DomainError> {
        self.list_where(SaleFilter::Customer(customer_id))
    }

    fn list_by_employee(&self, employee_id: i64) -> Result<Vec<SaleView>, DomainError> {
        self.list_where(SaleFilter::Employee(employee_id))
    }

    fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleView>, DomainError> {
        self.list_where(SaleFilter::DateRange(start, end))
    }

    fn list_items_by_sale(&self, sale_id: i64) -> Result<Vec<SaleItemView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = sale_items::table
            .filter(sale_items::sale_id.eq(sale_id))
            .order(sale_items::id.asc())
            .select(SaleItemRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(SaleItemView::from).collect())
    }

    fn list_items(&self) -> Result<Vec<SaleItemView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = sale_items::table
            .order(sale_items::id.asc())
            .select(SaleItemRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(SaleItemView::from).collect())
    }

    fn find_item(&self, id: i64) -> Result<Option<SaleItemView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = sale_items::table
            .find(id)
            .select(SaleItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(SaleItemView::from))
    }

    fn list_items_by_product(&self, product_id: i64) -> Result<Vec<SaleItemView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = sale_items::table
            .filter(sale_items::product_id.eq(product_id))
            .order(sale_items::id.asc())
            .select(SaleItemRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(SaleItemView::from).collect())
    }
}
