//! Manual trigger endpoint for the monitor pipeline.
//!
//! Operationally equivalent to one scheduled tick: the handler runs a full
//! cycle and reports what it did. Concurrent triggers queue on the monitor's
//! cycle lock rather than overlapping.

use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{CycleError, CycleReport, MonitorService};

/// Body returned by a completed cycle.
#[derive(Debug, Serialize, ToSchema)]
pub struct RunCycleResponse {
    /// Always `"completed"` on success.
    pub status: String,
    /// Indicator rows created.
    pub inserted: u32,
    /// Indicator rows shifted to a newer period.
    pub updated: u32,
    /// Fetched readings ignored as stale or untracked.
    pub skipped: u32,
    /// Definitions that breached.
    pub breaches: usize,
    /// Messages accepted by the delivery channel.
    pub messages_sent: usize,
}

impl From<CycleReport> for RunCycleResponse {
    fn from(report: CycleReport) -> Self {
        Self {
            status: "completed".to_owned(),
            inserted: report.reconciliation.inserted,
            updated: report.reconciliation.updated,
            skipped: report.reconciliation.skipped,
            breaches: report.breaches,
            messages_sent: report.messages_sent,
        }
    }
}

/// Body returned when a cycle aborts.
#[derive(Debug, Serialize, ToSchema)]
pub struct CycleErrorResponse {
    /// Stage-level failure description.
    pub message: String,
}

/// Run one monitor cycle now.
#[utoipa::path(
    post,
    path = "/api/monitor/run",
    tags = ["monitor"],
    responses(
        (status = 200, description = "Cycle completed", body = RunCycleResponse),
        (status = 502, description = "Feed unavailable", body = CycleErrorResponse),
        (status = 500, description = "Reconciliation failed", body = CycleErrorResponse)
    )
)]
#[post("/api/monitor/run")]
pub async fn run_monitor_cycle(service: web::Data<MonitorService>) -> HttpResponse {
    match service.run_cycle().await {
        Ok(report) => HttpResponse::Ok().json(RunCycleResponse::from(report)),
        Err(error @ CycleError::Feed(_)) => {
            warn!(error = %error, "manual cycle aborted at the feed stage");
            HttpResponse::BadGateway().json(CycleErrorResponse {
                message: error.to_string(),
            })
        }
        Err(error) => {
            warn!(error = %error, "manual cycle aborted during reconciliation");
            HttpResponse::InternalServerError().json(CycleErrorResponse {
                message: error.to_string(),
            })
        }
    }
}
