//! Route handlers

use super::{ApiError, AppState};
use crate::analysis::SiteReport;
use crate::error::Error;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub sitemap_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverRequest {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub sitemaps: Vec<String>,
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::Input(format!("Invalid request body: {}", rejection.body_text())).into())
}

/// Trimmed, non-blank field value
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Input(message.to_string()).into()),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn analyze_sitemap(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = parse_body(payload)?;
    let input = required(request.sitemap_url, "Sitemap URL is required")?;

    let resolved = state.client.analyze_sitemap(&input).await?;
    Ok(Json(AnalyzeResponse { urls: resolved.urls }))
}

pub async fn discover_sitemaps(
    State(state): State<AppState>,
    payload: Result<Json<DiscoverRequest>, JsonRejection>,
) -> Result<Json<DiscoverResponse>, ApiError> {
    let request = parse_body(payload)?;
    let base = required(request.base_url, "Base URL is required")?;

    let sitemaps = state.client.discover_all(&base).await;
    Ok(Json(DiscoverResponse { sitemaps }))
}

pub async fn site_report(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<SiteReport>, ApiError> {
    let request = parse_body(payload)?;
    let input = required(request.sitemap_url, "Sitemap URL is required")?;

    let resolved = state.client.analyze_sitemap(&input).await?;
    Ok(Json(SiteReport::build(resolved.sitemap_url, resolved.urls)))
}
