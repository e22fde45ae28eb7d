pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::sale_service::SaleService;
use crate::errors::AppError;
use crate::handlers::{payment_methods, sale_items, sales};
use crate::infrastructure::reference_lookup::DieselReferenceLookup;
use crate::infrastructure::sale_repo::DieselSaleRepository;
use crate::openapi::ApiDoc;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The sale service as wired for production: Diesel repository and lookups.
pub type SaleManager = SaleService<DieselSaleRepository, DieselReferenceLookup>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Mounts every `/api` route plus the OpenAPI document and Swagger UI.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/sales")
                    .route("", web::get().to(sales::list_sales))
                    .route("", web::post().to(sales::create_sale))
                    .route("/date-range", web::get().to(sales::list_sales_by_date_range))
                    .route(
                        "/customer/{customer_id}",
                        web::get().to(sales::list_sales_by_customer),
                    )
                    .route(
                        "/employee/{employee_id}",
                        web::get().to(sales::list_sales_by_employee),
                    )
                    .route("/{id}/items", web::get().to(sale_items::list_sale_items))
                    .route("/{id}", web::get().to(sales::get_sale))
                    .route("/{id}", web::put().to(sales::update_sale))
                    .route("/{id}", web::delete().to(sales::delete_sale)),
            )
            .service(
                web::scope("/sale-items")
                    .route("", web::get().to(sale_items::list_all_sale_items))
                    .route(
                        "/product/{product_id}",
                        web::get().to(sale_items::list_sale_items_by_product),
                    )
                    .route("/{id}", web::get().to(sale_items::get_sale_item)),
            )
            .route(
                "/payment-methods",
                web::get().to(payment_methods::list_payment_methods),
            ),
    )
    .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

/// Build and return an actix-web `Server` bound to the configured host and port.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &Config) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(SaleService::new(
        DieselSaleRepository::new(pool.clone()),
        DieselReferenceLookup::new(pool),
        config.sale_policy,
    ));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("Invalid request body: {}", err)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("Invalid query string: {}", err)).into()
            }))
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
