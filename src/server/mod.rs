//! HTTP front end
//!
//! Routes:
//! - `POST /analyze` - crawl the site named in `{"domain": "..."}`
//! - `GET /api/sitemap/*domain` - sitemap listing, or a small crawl without one
//! - `GET /health` - liveness check
//!
//! Every handler shares one [`Crawler`] and therefore one HTTP connection pool.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{analyze_handler, health_handler, sitemap_handler, AnalyzeRequest};

use crate::config::Config;
use crate::{Crawler, SiteMapperError};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared with every handler
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the shared crawler from `config`
    pub fn new(config: Config) -> Result<Self, SiteMapperError> {
        let crawler = Crawler::new(&config)?;
        Ok(Self {
            crawler: Arc::new(crawler),
            config: Arc::new(config),
        })
    }
}

/// Builds the router with all routes attached
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/api/sitemap/*domain", get(sitemap_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves the API on an already bound listener until the task is dropped
pub async fn serve_on(listener: TcpListener, config: Config) -> Result<(), SiteMapperError> {
    let app = build_router(AppState::new(config)?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds the configured address and serves the API
///
/// # Arguments
///
/// * `config` - Full configuration; `[server]` selects the address
///
/// # Returns
///
/// * `Ok(())` - The server shut down
/// * `Err(SiteMapperError)` - Binding failed or the client could not be built
pub async fn serve(config: Config) -> Result<(), SiteMapperError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    let local: SocketAddr = listener.local_addr()?;
    tracing::info!("Listening on http://{}", local);

    serve_on(listener, config).await
}
