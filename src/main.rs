use clothing_store::{build_server, create_pool, run_migrations, Config};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.pool_max_size)?;
    run_migrations(&pool)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!(
        "OpenAPI docs at http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    build_server(pool, &config)?.await?;
    Ok(())
}
