//src/main.rs

use axum::{
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG manda; sem ele, info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    let app = router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()));

    let listener = TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    let sales_routes = Router::new()
        .route("/"
               ,get(handlers::sales::list_sales)
               .post(handlers::sales::create_sale)
        )
        .route("/search", get(handlers::sales::search_sales))
        .route("/options", get(handlers::sales::get_options))
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .patch(handlers::sales::update_sale)
               .delete(handlers::sales::delete_sale)
        );

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/biometrics", get(handlers::dashboard::get_biometrics))
        .route("/stream", get(handlers::dashboard::stream_dashboard));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/vendas", sales_routes)
        .nest("/api/dashboard", dashboard_routes)
        .route("/api/rankings", get(handlers::rankings::get_rankings))
        .with_state(app_state)
}
