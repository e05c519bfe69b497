//! Health endpoints: liveness and readiness probes for orchestration.
//!
//! Healthy probes answer with the success envelope; failing probes answer a
//! bare 503 so load balancers never parse a body.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::envelope::ApiResponse;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as draining so liveness checks fail fast.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe result body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProbeStatus {
    #[schema(example = "UP")]
    pub status: String,
}

fn probe_response(probe_ok: bool, req: &actix_web::HttpRequest) -> HttpResponse {
    let mut response = if probe_ok {
        ApiResponse::ok(ProbeStatus {
            status: "UP".to_owned(),
        })
        .respond_to(req)
    } else {
        HttpResponse::ServiceUnavailable().finish()
    };
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ApiResponse<ProbeStatus>),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>, req: actix_web::HttpRequest) -> HttpResponse {
    probe_response(state.is_ready(), &req)
}

/// Liveness probe. Returns 503 once [`HealthState::mark_unhealthy`] is called.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = ApiResponse<ProbeStatus>),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>, req: actix_web::HttpRequest) -> HttpResponse {
    probe_response(state.is_alive(), &req)
}
