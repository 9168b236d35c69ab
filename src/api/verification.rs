//! REST API endpoints for answer verification

use std::time::Duration;

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::{health, quality};
use crate::model::{
    Agreement, AgreementLevel, CheckerResult, Claim, ClaimKind, QualityLogEntry, QualityMetrics,
    QualityReport, ScoreComparison,
};
use crate::service::{QualityOutcome, QualityService};

#[derive(OpenApi)]
#[openapi(
    paths(
        verify,
        parse_metrics,
        quality::report_text,
        quality::report_summary,
        quality::list_entries,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        VerifyRequest,
        ParseMetricsRequest,
        QualityOutcome,
        CheckerResult,
        Claim,
        ClaimKind,
        Agreement,
        AgreementLevel,
        ScoreComparison,
        QualityMetrics,
        QualityLogEntry,
        QualityReport,
        ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    tags(
        (name = "verification", description = "Deterministic answer verification"),
        (name = "quality", description = "Quality log and aggregate reports"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Answer to verify, with the optional reviewer output
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Question the answer responds to
    pub question: String,
    /// Generated answer text
    pub answer: String,
    /// Reviewer model output carrying a metrics block
    #[serde(default)]
    pub reviewer_text: Option<String>,
    /// Deadline for the checker pass in seconds; the server default applies when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseMetricsRequest {
    pub text: String,
}

/// Verify an answer against the knowledge graph and log the outcome
#[utoipa::path(
    post,
    path = "/v1/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Answer verified", body = QualityOutcome),
        (status = 400, description = "Empty answer or zero timeout", body = ErrorResponse),
        (status = 503, description = "Knowledge graph unavailable", body = ErrorResponse),
        (status = 504, description = "Verification timed out", body = ErrorResponse)
    ),
    tag = "verification"
)]
#[post("/v1/verify")]
pub async fn verify(
    service: web::Data<QualityService>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.answer.trim().is_empty() {
        return Err(ApiError::BadRequest("answer must not be empty".to_string()));
    }
    if request.timeout_secs == Some(0) {
        return Err(ApiError::BadRequest("timeout_secs must be positive".to_string()));
    }

    let outcome = service
        .process(
            &request.question,
            &request.answer,
            request.reviewer_text.as_deref(),
            request.timeout_secs.map(Duration::from_secs),
        )
        .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// Extract reviewer metrics from free text
#[utoipa::path(
    post,
    path = "/v1/metrics/parse",
    request_body = ParseMetricsRequest,
    responses(
        (status = 200, description = "Parsed metrics, defaults when none were found", body = QualityMetrics)
    ),
    tag = "verification"
)]
#[post("/v1/metrics/parse")]
pub async fn parse_metrics(
    service: web::Data<QualityService>,
    body: web::Json<ParseMetricsRequest>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.parser().parse(&body.text))
}

/// Configure verification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify).service(parse_metrics);
}
