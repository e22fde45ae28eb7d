pub mod payment_methods;
pub mod sale_items;
pub mod sales;

use actix_web::web;

use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::SaleManager;

/// Runs a service call on actix's blocking pool; Diesel connections are
/// synchronous and must not hold up the async workers.
pub(crate) async fn blocking<T, F>(service: web::Data<SaleManager>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&SaleManager) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || f(service.get_ref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}
