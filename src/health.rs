// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Health check endpoints

use crate::config::BackendFailurePolicy;
use crate::constants::service;
use crate::planner::WorkoutPlanGenerator;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Overall health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Fixed payload of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessPayload {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    /// "mock" or "live"
    pub mode: String,
    pub backend: String,
    pub model: String,
    pub knowledge_base: bool,
    pub timestamp: String,
}

/// Detailed response of the readiness and liveness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: ServiceInfo,
    pub checks: Vec<ComponentHealth>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    /// Environment (development, staging, production)
    pub environment: String,
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
}

/// Health checker for the workout worker
pub struct HealthChecker {
    start_time: Instant,
    mock_mode: bool,
    on_backend_failure: BackendFailurePolicy,
    backend: Option<(String, String)>,
    knowledge_base: bool,
}

impl HealthChecker {
    /// Snapshot what the generator was built with
    pub fn new(generator: &WorkoutPlanGenerator) -> Self {
        let settings = generator.settings();
        Self {
            start_time: Instant::now(),
            mock_mode: settings.mock_mode,
            on_backend_failure: settings.on_backend_failure,
            backend: generator
                .backend()
                .map(|b| (b.name().to_string(), b.model().to_string())),
            knowledge_base: generator.knowledge().is_some(),
        }
    }

    /// Fixed liveness payload, always healthy while the process serves requests
    pub fn liveness_payload(&self) -> LivenessPayload {
        let (backend, model) = match &self.backend {
            Some((name, model)) => (name.clone(), model.clone()),
            None => ("none".to_string(), "mock".to_string()),
        };

        LivenessPayload {
            status: HealthStatus::Healthy,
            service: service::SERVICE_NAME.to_string(),
            version: service::SERVICE_VERSION.to_string(),
            mode: if self.mock_mode { "mock" } else { "live" }.to_string(),
            backend,
            model,
            knowledge_base: self.knowledge_base,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: service::SERVICE_NAME.to_string(),
            version: service::SERVICE_VERSION.to_string(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "unknown".to_string()),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Liveness probe: the service is running
    pub fn liveness(&self) -> HealthResponse {
        HealthResponse {
            status: HealthStatus::Healthy,
            service: self.service_info(),
            checks: vec![ComponentHealth {
                name: "service".to_string(),
                status: HealthStatus::Healthy,
                message: "Service is running".to_string(),
                metadata: None,
            }],
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Readiness probe: the service can produce plans
    pub fn readiness(&self) -> HealthResponse {
        let checks = vec![self.check_generation(), self.check_knowledge()];

        let status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthResponse {
            status,
            service: self.service_info(),
            checks,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn check_generation(&self) -> ComponentHealth {
        let (status, message) = match (&self.backend, self.mock_mode, self.on_backend_failure) {
            (_, true, _) => (HealthStatus::Healthy, "Mock synthesis enabled".to_string()),
            (Some((name, model)), false, _) => (
                HealthStatus::Healthy,
                format!("Backend {} configured with model {}", name, model),
            ),
            (None, false, BackendFailurePolicy::FallbackToMock) => (
                HealthStatus::Degraded,
                "No backend configured, serving mock plans".to_string(),
            ),
            (None, false, BackendFailurePolicy::Fail) => (
                HealthStatus::Unhealthy,
                "No backend configured and mock mode disabled".to_string(),
            ),
        };

        ComponentHealth {
            name: "generation".to_string(),
            status,
            message,
            metadata: Some(serde_json::json!({
                "mock_mode": self.mock_mode,
                "on_backend_failure": self.on_backend_failure,
            })),
        }
    }

    fn check_knowledge(&self) -> ComponentHealth {
        ComponentHealth {
            name: "knowledge_base".to_string(),
            status: if self.knowledge_base {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            message: if self.knowledge_base {
                "Knowledge base loaded".to_string()
            } else {
                "Knowledge base disabled".to_string()
            },
            metadata: None,
        }
    }
}

/// Health check routes; never behind the authorization policy
pub mod middleware {
    use super::*;
    use std::sync::Arc;
    use warp::{Filter, Reply};

    pub fn routes(
        health_checker: Arc<HealthChecker>,
    ) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
        let health = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_health_checker(health_checker.clone()))
            .map(|checker: Arc<HealthChecker>| warp::reply::json(&checker.liveness_payload()));

        let ready = warp::path("ready")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_health_checker(health_checker.clone()))
            .map(|checker: Arc<HealthChecker>| {
                let response = checker.readiness();
                let status_code = match response.status {
                    HealthStatus::Unhealthy => warp::http::StatusCode::SERVICE_UNAVAILABLE,
                    _ => warp::http::StatusCode::OK,
                };
                warp::reply::with_status(warp::reply::json(&response), status_code)
            });

        let live = warp::path("live")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_health_checker(health_checker))
            .map(|checker: Arc<HealthChecker>| warp::reply::json(&checker.liveness()));

        health.or(ready).or(live)
    }

    fn with_health_checker(
        health_checker: Arc<HealthChecker>,
    ) -> impl Filter<Extract = (Arc<HealthChecker>,), Error = std::convert::Infallible> + Clone {
        warp::any().map(move || health_checker.clone())
    }
}
