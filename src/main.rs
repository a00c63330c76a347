// Pulse Service Main Entry Point
// Serves repository activity data to the browser dashboard over HTTP
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use pulse_service::{api, InsightsManager, PulseConfig};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("PULSE_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_for(origin: Option<&str>) -> Cors {
    let cors = match origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration before logging so RUST_LOG from .env applies
    dotenv::dotenv().ok();
    init_logging();

    info!("Starting Pulse Service");

    let config = PulseConfig::from_env()?;
    let bind = (config.host.clone(), config.service_port);
    let allowed_origin = config.allowed_origin.clone();

    info!(
        api_base = %config.api_base,
        queries = ?config.discovery_queries(),
        timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    let manager = Arc::new(InsightsManager::from_config(config)?);
    let state = api::AppState::new(manager);

    // Warm the dashboard session in the background
    let session = state.session.clone();
    actix_web::rt::spawn(async move {
        session.load_repositories().await;
    });

    info!("🚀 Pulse Service listening on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_for(allowed_origin.as_deref()))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(api::dashboard_routes)
    })
    .bind(bind)?
    .run()
    .await?;

    info!("Pulse Service shutting down");
    Ok(())
}
