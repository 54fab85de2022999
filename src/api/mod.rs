// HTTP surface: router, shared state and the query endpoint.

pub mod error;
pub mod handler;

pub use error::ApiError;
pub use handler::{QueryResponse, answer_query};

use crate::dataset::Dataset;
use crate::summary::SummaryGenerator;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::post;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub summaries: SummaryGenerator,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, summaries: SummaryGenerator) -> Self {
        Self { dataset, summaries }
    }
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let query_route = post(handler::query_handler).fallback(handler::method_not_allowed);

    Router::new()
        .route("/api/query/", query_route.clone())
        .route("/api/query", query_route)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handler::handle_panic))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}
