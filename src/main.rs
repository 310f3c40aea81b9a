mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod filter;
#[cfg(test)]
mod fixtures;
mod models;
mod pagination;
mod routes;
mod templates;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/movies", get(routes::movies))
        .route("/movies/{slug}", get(routes::movie))
        .route("/martial-arts/{slug}", get(routes::martial_art))
        .route("/sitemap.xml", get(routes::sitemap))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,martialmovies=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = Arc::new(
        db::connect_and_migrate(&config.database_url, config.database_max_connections).await?,
    );
    let catalog = Catalog::new(db.clone());

    let state = Arc::new(AppState { config: config.clone(), catalog });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown_signal()).await?;

    match Arc::try_unwrap(db) {
        Ok(db) => {
            db.close().await?;
            tracing::info!("database closed");
        }
        Err(_) => tracing::warn!("database still in use at shutdown"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
