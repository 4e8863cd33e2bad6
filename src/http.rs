//! JSON routes over [`Analyzer`].

use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::app::analyzer::Analyzer;
use crate::app::model::{Url, UrlCheck, UrlDetails, UrlSummary};
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct AddUrlRequest {
    pub url: String,
}

pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/urls", get(list_urls).post(add_url))
        .route("/urls/:id", get(show_url))
        .route("/urls/:id/checks", get(list_checks).post(run_check))
        .layer(TraceLayer::new_for_http())
        .with_state(analyzer)
}

async fn list_urls(
    State(analyzer): State<Arc<Analyzer>>,
) -> Result<Json<Vec<UrlSummary>>, ApiError> {
    Ok(Json(analyzer.list_urls().await?))
}

async fn add_url(
    State(analyzer): State<Arc<Analyzer>>,
    request: Result<Json<AddUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Url>), ApiError> {
    let Json(request) = request?;
    let url = analyzer.add_url(&request.url).await?;
    Ok((StatusCode::CREATED, Json(url)))
}

async fn show_url(
    State(analyzer): State<Arc<Analyzer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UrlDetails>, ApiError> {
    let Path(id) = id?;
    Ok(Json(analyzer.show_url(id).await?))
}

async fn list_checks(
    State(analyzer): State<Arc<Analyzer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<UrlCheck>>, ApiError> {
    let Path(id) = id?;
    analyzer.get_url(id).await?;
    Ok(Json(analyzer.list_checks(id).await?))
}

async fn run_check(
    State(analyzer): State<Arc<Analyzer>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<UrlCheck>), ApiError> {
    let Path(id) = id?;
    let check = analyzer.run_check(id).await?;
    Ok((StatusCode::CREATED, Json(check)))
}

/// Every error response is a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub enum ApiError {
    Analyzer(Error),
    /// The request itself could not be read (bad body or path segment).
    Request { status: StatusCode, message: String },
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Analyzer(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Request {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Analyzer(Error::InvalidUrl { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Analyzer(Error::Duplicate { .. }) => StatusCode::CONFLICT,
            Self::Analyzer(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Analyzer(Error::Fetch { .. }) => StatusCode::BAD_GATEWAY,
            Self::Analyzer(Error::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Request { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Analyzer(err) if err.is_domain() => err.to_string(),
            Self::Analyzer(_) => "internal storage error".to_owned(),
            Self::Request { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}
