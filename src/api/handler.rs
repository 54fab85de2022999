use super::AppState;
use super::error::ApiError;
use crate::analyzer::{aggregate, build_chart, extract_localities};
use crate::model::ChartSeries;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::any::Any;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub areas: Vec<String>,
    pub summary: String,
    pub chart: Vec<ChartSeries>,
    pub table: Vec<Map<String, JsonValue>>,
}

/// `POST /api/query/` with `{ "query": "..." }`.
pub async fn query_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = extract_query(&body).ok_or(ApiError::Validation)?;
    let response = answer_query(&state, query).await?;
    Ok(Json(response))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Unparseable or non-object bodies are treated as `{}`.
fn extract_query(body: &[u8]) -> Option<String> {
    let payload: JsonValue = serde_json::from_slice(body).ok()?;
    payload
        .get("query")
        .and_then(JsonValue::as_str)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Runs the whole pipeline for one query.
pub async fn answer_query(state: &AppState, query: String) -> Result<QueryResponse, ApiError> {
    let dataset = state.dataset.as_ref();
    dataset.require_columns()?;

    let areas = extract_localities(&query, &dataset.localities());
    if areas.is_empty() {
        info!("No localities matched query {:?}", query);
        return Err(ApiError::NotFound);
    }
    info!("Query {:?} resolved to {:?}", query, areas);

    let rows = dataset.filter_localities(&areas);
    let aggregates = aggregate(dataset, &areas)?;
    let summary = state
        .summaries
        .summarize(&query, &areas, &aggregates, &rows)
        .await;
    let chart = build_chart(&aggregates, &areas);
    let table = rows.iter().map(|row| dataset.row_to_json(row)).collect();

    Ok(QueryResponse {
        query,
        areas,
        summary: summary.text,
        chart,
        table,
    })
}

pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unexpected server error".to_string()
    };
    ApiError::Internal(message).into_response()
}
