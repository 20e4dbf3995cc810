//! HTTP API server
//!
//! Routes:
//! - `GET  /health`
//! - `POST /api/analyze-sitemap`   `{sitemapUrl}` -> `{urls}`
//! - `POST /api/discover-sitemaps` `{baseUrl}` -> `{sitemaps}`
//! - `POST /api/site-report`       `{sitemapUrl}` -> full `SiteReport`
//!
//! Every failure, including panics and unknown routes, answers with JSON.

mod handlers;

pub use handlers::*;

use crate::config::Config;
use crate::crawl::SitemapClient;
use crate::error::{Error, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: SitemapClient,
}

/// An error on its way to becoming a JSON response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::Input(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            Error::Fetch { .. } | Error::Parse(_) | Error::Http(_) => {
                error!("Analysis error: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Failure: {}", self.0.reason()) }),
                )
            }
            other => {
                error!("Unhandled error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Critical Server Error", "details": other.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Handler panicked: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Critical Server Error", "details": details })),
    )
        .into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze-sitemap", post(analyze_sitemap))
        .route("/api/discover-sitemaps", post(discover_sitemaps))
        .route("/api/site-report", post(site_report))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Run the API until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let client = SitemapClient::new(config.fetch.clone())?;
    let app = router(AppState { client });

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn spawn_app() -> String {
        let client = SitemapClient::new(FetchConfig::default()).unwrap();
        let app = router(AppState { client });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_json(url: String, body: Value) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn mount(server: &MockServer, at: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn urlset(locs: &[&str]) -> String {
        let body: String = locs
            .iter()
            .map(|l| format!("<url><loc>{}</loc></url>", l))
            .collect();
        format!("<urlset>{}</urlset>", body)
    }

    /// robots.txt -> sitemap index -> two urlsets sharing one URL
    async fn mock_site() -> MockServer {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount(
            &server,
            "/robots.txt",
            200,
            format!("User-agent: *\nDisallow:\nSitemap: {}/sitemap_index.xml\n", uri),
        )
        .await;
        mount(
            &server,
            "/sitemap_index.xml",
            200,
            format!(
                "<sitemapindex><sitemap><loc>{uri}/sitemap-posts.xml</loc></sitemap>\
                 <sitemap><loc>{uri}/sitemap-pages.xml</loc></sitemap></sitemapindex>"
            ),
        )
        .await;
        mount(
            &server,
            "/sitemap-posts.xml",
            200,
            urlset(&[
                "https://example.com/blog/first-post",
                "https://example.com/blog/second-post",
                "https://example.com/about",
            ]),
        )
        .await;
        mount(
            &server,
            "/sitemap-pages.xml",
            200,
            urlset(&[
                "https://example.com/about",
                "https://example.com/contact",
                "https://example.com/shop/red-shoes",
            ]),
        )
        .await;
        server
    }

    #[tokio::test]
    async fn test_health() {
        let app = spawn_app().await;
        let body: Value = reqwest::get(format!("{}/health", app))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_blank_input_is_bad_request() {
        let app = spawn_app().await;

        let (status, body) =
            post_json(format!("{}/api/analyze-sitemap", app), json!({ "sitemapUrl": "  " })).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Sitemap URL is required");

        let (status, body) = post_json(format!("{}/api/analyze-sitemap", app), json!({})).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Sitemap URL is required");

        let (status, body) =
            post_json(format!("{}/api/discover-sitemaps", app), json!({ "baseUrl": "" })).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Base URL is required");
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_bad_request() {
        let app = spawn_app().await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/discover-sitemaps", app))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_analyze_end_to_end_via_robots() {
        let site = mock_site().await;
        let app = spawn_app().await;

        let (status, body) =
            post_json(format!("{}/api/analyze-sitemap", app), json!({ "sitemapUrl": site.uri() })).await;

        assert_eq!(status, 200);
        let urls: Vec<&str> = body["urls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u.as_str().unwrap())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/blog/first-post",
                "https://example.com/blog/second-post",
                "https://example.com/about",
                "https://example.com/contact",
                "https://example.com/shop/red-shoes",
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_end_to_end() {
        let site = mock_site().await;
        let app = spawn_app().await;

        let (status, body) =
            post_json(format!("{}/api/discover-sitemaps", app), json!({ "baseUrl": site.uri() })).await;

        assert_eq!(status, 200);
        assert_eq!(
            body["sitemaps"],
            json!([format!("{}/sitemap_index.xml", site.uri())])
        );
    }

    #[tokio::test]
    async fn test_analyze_dedupes_urls() {
        let site = MockServer::start().await;
        mount(
            &site,
            "/sitemap.xml",
            200,
            urlset(&["http://a.com/x", "http://a.com/x", "http://a.com/y"]),
        )
        .await;
        let app = spawn_app().await;

        let (status, body) = post_json(
            format!("{}/api/analyze-sitemap", app),
            json!({ "sitemapUrl": format!("{}/sitemap.xml", site.uri()) }),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["urls"], json!(["http://a.com/x", "http://a.com/y"]));
    }

    #[tokio::test]
    async fn test_analyze_statuses_for_failures() {
        let site = MockServer::start().await;
        mount(&site, "/empty.xml", 200, "<urlset/>".to_string()).await;
        mount(&site, "/broken.xml", 200, "<urlset><url>".to_string()).await;
        let app = spawn_app().await;
        let endpoint = format!("{}/api/analyze-sitemap", app);

        let (status, body) =
            post_json(endpoint.clone(), json!({ "sitemapUrl": format!("{}/empty.xml", site.uri()) })).await;
        assert_eq!(status, 404);
        assert!(body["error"].as_str().unwrap().starts_with("No URLs successfully extracted"));

        let (status, body) =
            post_json(endpoint.clone(), json!({ "sitemapUrl": format!("{}/gone.xml", site.uri()) })).await;
        assert_eq!(status, 500);
        assert_eq!(body["error"], "Failure: Not Found");

        let (status, body) =
            post_json(endpoint, json!({ "sitemapUrl": format!("{}/broken.xml", site.uri()) })).await;
        assert_eq!(status, 500);
        assert!(body["error"].as_str().unwrap().starts_with("Failure: "));
    }

    #[tokio::test]
    async fn test_site_report() {
        let site = mock_site().await;
        let app = spawn_app().await;

        let (status, body) =
            post_json(format!("{}/api/site-report", app), json!({ "sitemapUrl": site.uri() })).await;

        assert_eq!(status, 200);
        assert_eq!(body["sitemapUrl"], format!("{}/sitemap_index.xml", site.uri()));
        assert_eq!(body["urlCount"], 5);
        assert_eq!(body["maxDepth"], 2);
        assert_eq!(body["themes"][0], json!({ "name": "blog", "score": 8 }));
        assert!(body["tree"]["children"]["shop"]["children"]["red-shoes"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json() {
        let app = spawn_app().await;
        let response = reqwest::get(format!("{}/nope", app)).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_panic_becomes_json() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Critical Server Error");
        assert_eq!(body["details"], "boom");
    }
}
