//! Request handlers

use super::error::ApiError;
use super::AppState;
use crate::sitemap::{map_site, SiteMap};
use crate::url::{site_url_from_input, EMPTY_DOMAIN};
use crate::CrawlResult;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Crawls the requested site with the configured budget
pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<CrawlResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected analyze body: {}", e);
        ApiError::BadRequest(EMPTY_DOMAIN.to_string())
    })?;

    let site = site_url_from_input(request.domain.as_deref().unwrap_or_default())?;
    tracing::info!("Analyze request for {}", site);

    let settings = &state.config.crawler;
    let result = state
        .crawler
        .crawl(site.as_str(), settings.max_pages, settings.max_workers)
        .await?;

    Ok(Json(result))
}

/// Lists a site's pages from its sitemap, falling back to a small crawl
pub async fn sitemap_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<SiteMap>, ApiError> {
    let site = site_url_from_input(&domain)?;
    tracing::info!("Sitemap request for {}", site);

    let listing = map_site(&state.crawler, &site, &state.config.sitemap).await?;
    Ok(Json(listing))
}

/// Liveness check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
