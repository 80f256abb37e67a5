//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the small HTTP surface: the manual trigger and the health probes.

use utoipa::OpenApi;

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Economic indicator alert backend API",
        description = "Manual pipeline trigger and health probes; the alert \
                       pipeline itself runs on a schedule."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::monitor::run_monitor_cycle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::inbound::http::monitor::RunCycleResponse,
        crate::inbound::http::monitor::CycleErrorResponse,
    )),
    tags(
        (name = "monitor", description = "Run a reconcile/evaluate/dispatch cycle on demand"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
