//! Courtside
//!
//! Main application entry point

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use courtside::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService},
    handlers,
    middleware::RequestLogger,
    state::AppState,
    utils::logging,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", courtside::info());

    let database = if settings.database.is_memory() {
        info!("Using in-memory store");
        DatabaseService::in_memory()
    } else {
        info!("Connecting to database...");
        let pool = create_pool(&settings.database).await?;
        run_migrations(&pool).await?;
        DatabaseService::postgres(pool)
    };

    info!("Initializing services...");
    let bind = (settings.server.host.clone(), settings.server.port);
    let workers = settings.server.workers;
    let state = web::Data::new(AppState::new(settings, database)?);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(RequestLogger)
            .configure(handlers::configure)
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    info!(host = %bind.0, port = bind.1, "Listening");
    server
        .bind(bind)
        .context("failed to bind HTTP listener")?
        .run()
        .await?;

    info!("Courtside has been shut down.");
    Ok(())
}
