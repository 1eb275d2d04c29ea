use actix_web::{App, HttpServer, web};
use study_planner_api::data::database;
use study_planner_api::data::sqlite::SqliteStore;
use study_planner_api::infrastructure::config::Config;
use study_planner_api::infrastructure::logging::init_logging;
use study_planner_api::presentation::handlers::AppState;
use study_planner_api::presentation::middleware::RequestTracing;
use study_planner_api::presentation::routes::{ROUTES, configure_api, cors};
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized successfully");

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::other(e.to_string())
    })?;

    info!(database_url = %config.database_url, "Opening database");
    let pool = database::connect(&config.database_url, config.max_connections)
        .await
        .map_err(|e| {
            error!(error = %format!("{:#}", e), "Failed to prepare database");
            std::io::Error::other(e.to_string())
        })?;
    info!("Database ready");

    let state = web::Data::new(AppState::new(
        SqliteStore::new(pool),
        config.identity.clone(),
    ));
    info!(email = %config.identity.email, "Application state initialized");

    let cors_origin = config.cors_origin.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(cors(&cors_origin))
            .wrap(RequestTracing)
            .configure(configure_api)
    });

    let bind_addr = config.bind_address();
    let server = server.bind(bind_addr.as_str())?;
    info!(
        address = %bind_addr,
        cors_origin = %config.cors_origin,
        routes = %ROUTES,
        "Starting HTTP server"
    );
    server.run().await
}
