//! REST API endpoints for the quality log

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{QualityLogEntry, QualityReport};
use crate::service::QualityService;

/// Query parameters for listing log entries
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEntriesParams {
    /// Return only the most recent N entries
    pub limit: Option<usize>,
}

/// Aggregate quality report as plain text
#[utoipa::path(
    get,
    path = "/v1/quality/report",
    responses(
        (status = 200, description = "Aggregate report", body = String, content_type = "text/plain"),
        (status = 500, description = "Quality log unreadable", body = ErrorResponse)
    ),
    tag = "quality"
)]
#[get("/v1/quality/report")]
pub async fn report_text(service: web::Data<QualityService>) -> Result<HttpResponse, ApiError> {
    let text = service.report_text().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(text))
}

/// Aggregate quality report as JSON
#[utoipa::path(
    get,
    path = "/v1/quality/summary",
    responses(
        (status = 200, description = "Aggregate report", body = QualityReport),
        (status = 500, description = "Quality log unreadable", body = ErrorResponse)
    ),
    tag = "quality"
)]
#[get("/v1/quality/summary")]
pub async fn report_summary(service: web::Data<QualityService>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.report().await?))
}

/// Logged entries, oldest first
#[utoipa::path(
    get,
    path = "/v1/quality/entries",
    params(ListEntriesParams),
    responses(
        (status = 200, description = "Log entries", body = Vec<QualityLogEntry>),
        (status = 500, description = "Quality log unreadable", body = ErrorResponse)
    ),
    tag = "quality"
)]
#[get("/v1/quality/entries")]
pub async fn list_entries(
    service: web::Data<QualityService>,
    query: web::Query<ListEntriesParams>,
) -> Result<HttpResponse, ApiError> {
    let entries = service.entries(query.limit).await?;
    tracing::debug!(count = entries.len(), limit = ?query.limit, "Listing quality log entries");
    Ok(HttpResponse::Ok().json(entries))
}

/// Configure quality routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(report_text)
        .service(report_summary)
        .service(list_entries);
}
