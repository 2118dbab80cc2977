//! Route handlers.
//!
//! Each handler extracts path and query inputs, runs the matching
//! `QueryEngine` operation and records the request metric.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::http::response::{ApiError, ListBody};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::query::{Pagination, QueryError, UNBOUNDED_SIZE};

/// Query parameters for `/classes` and `/classes/{mod}`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassesParams {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "unbounded")]
    pub size: i64,
}

/// Query parameters for `/classes/search/{term}`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "unbounded")]
    pub size: i64,
}

fn unbounded() -> i64 {
    UNBOUNDED_SIZE
}

/// `GET /classes`
pub async fn list_classes(
    State(state): State<AppState>,
    Query(params): Query<ClassesParams>,
) -> Result<ListBody, ApiError> {
    classes(&state, None, params)
}

/// `GET /classes/{mod}`
pub async fn list_mod_classes(
    State(state): State<AppState>,
    Path(mod_name): Path<String>,
    Query(params): Query<ClassesParams>,
) -> Result<ListBody, ApiError> {
    classes(&state, Some(mod_name), params)
}

/// `GET /classes/search/{term}`
pub async fn search_classes(
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<ListBody, ApiError> {
    let start = Instant::now();
    tracing::info!(
        term = %term,
        page = params.page,
        size = params.size,
        "Executing /classes/search endpoint"
    );

    let result = Pagination::from_params(params.page, params.size)
        .map_err(QueryError::from)
        .and_then(|pagination| state.engine.search(&term, pagination));
    finish("search", start, result)
}

fn classes(
    state: &AppState,
    mod_name: Option<String>,
    params: ClassesParams,
) -> Result<ListBody, ApiError> {
    let start = Instant::now();
    tracing::info!(
        mod_name = mod_name.as_deref().unwrap_or(""),
        item_type = params.item_type.as_deref().unwrap_or(""),
        page = params.page,
        size = params.size,
        "Executing /classes endpoint"
    );

    let result = Pagination::from_params(params.page, params.size)
        .map_err(QueryError::from)
        .and_then(|pagination| {
            state
                .engine
                .list_classes(mod_name.as_deref(), params.item_type.as_deref(), pagination)
        });
    finish("classes", start, result)
}

fn finish(
    endpoint: &'static str,
    start: Instant,
    result: Result<Vec<String>, QueryError>,
) -> Result<ListBody, ApiError> {
    match result {
        Ok(items) => {
            metrics::record_request(endpoint, 200, start);
            Ok(ListBody(items))
        }
        Err(e) => {
            let error = ApiError::from(e);
            tracing::warn!(endpoint, error = %error.0, "Query failed");
            metrics::record_request(endpoint, error.status().as_u16(), start);
            Err(error)
        }
    }
}
