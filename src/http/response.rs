//! Response rendering.
//!
//! # Responsibilities
//! - Render query results as a list body
//! - Map query failures to HTTP responses
//!
//! # Design Decisions
//! - Every failure is a 500 carrying the human-readable message; there is
//!   no structured error body

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::query::{render, QueryError};

/// Successful query result: items rendered as `[a, b, c]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBody(pub Vec<String>);

impl IntoResponse for ListBody {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/json")],
            render(&self.0),
        )
            .into_response()
    }
}

/// A query failure surfaced at the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.0.to_string()).into_response()
    }
}
