use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue};
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shorewatch_common::Config;
use shorewatch_harvester::store::{CacheStore, PgCacheStore};

mod rest;

pub struct AppState {
    pub store: Arc<dyn CacheStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shorewatch=info".parse()?))
        .init();

    let config = Config::web_from_env();
    let store = Arc::new(PgCacheStore::connect(&config.database_url).await?);

    let state = Arc::new(AppState { store });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Cached feature collection (GET only; the handler rejects the rest)
        .route("/miles.geojson", any(rest::serve_feature_collection))
        .with_state(state)
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // The payload changes at most once per harvest; clients may keep it for a day
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        ));

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(addr = addr.as_str(), "Shorewatch API listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
