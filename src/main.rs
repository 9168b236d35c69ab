use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod graph;
mod model;
mod service;

use app::AppState;
use graph::GraphClient;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e)
    })?;

    // Not fatal: the graph may come up after the service
    if let Err(e) = state.graph.ping().await {
        tracing::warn!(error = %e, "Knowledge graph not reachable at startup");
    }

    let graph = web::Data::new(state.graph.clone());
    let quality = web::Data::from(state.quality.clone());

    tracing::info!("Starting knowledge-graph fidelity checker on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(graph.clone())
            .app_data(quality.clone())
            .configure(api::health::configure)
            .configure(api::verification::configure)
            .configure(api::quality::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
