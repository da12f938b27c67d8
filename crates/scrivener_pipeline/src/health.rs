//! Aggregate health of the orchestrator's collaborators.

use derive_getters::Getters;
use scrivener_interface::HealthStatus;
use serde::{Deserialize, Serialize};

/// Overall verdict across every probed service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverallHealth {
    /// Every service reported healthy
    Healthy,
    /// At least one service is unhealthy or unreachable
    Degraded,
}

/// One probed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ServiceHealth {
    /// Service name
    name: String,
    /// Probe outcome
    status: HealthStatus,
}

impl ServiceHealth {
    /// Pair a service name with its probe outcome.
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Result of probing the store and every retriever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HealthReport {
    /// Healthy only when every service is
    status: OverallHealth,
    /// Per-service outcomes, store first, then retrievers in chain order
    services: Vec<ServiceHealth>,
}

impl HealthReport {
    /// Build a report, deriving the overall status.
    pub fn from_services(services: Vec<ServiceHealth>) -> Self {
        let status = if services.iter().all(|service| service.status.is_healthy()) {
            OverallHealth::Healthy
        } else {
            OverallHealth::Degraded
        };
        Self { status, services }
    }

    /// Whether every service is healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == OverallHealth::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_failure_degrades() {
        let report = HealthReport::from_services(vec![
            ServiceHealth::new("store", HealthStatus::Healthy),
            ServiceHealth::new(
                "secondary",
                HealthStatus::Unreachable {
                    message: "connection refused".to_string(),
                },
            ),
        ]);
        assert_eq!(*report.status(), OverallHealth::Degraded);
        assert_eq!(report.status().to_string(), "degraded");
    }

    #[test]
    fn test_no_services_is_healthy() {
        assert!(HealthReport::from_services(Vec::new()).is_healthy());
    }
}
