//! Health reporting for collaborators.

use serde::{Deserialize, Serialize};

/// Health status of a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthStatus {
    /// Fully operational
    Healthy,
    /// Responding, but not normally
    Unhealthy {
        /// Description of the problem
        message: String,
    },
    /// Could not be reached
    Unreachable {
        /// Description of the failure
        message: String,
    },
}

impl HealthStatus {
    /// Whether the collaborator is fully operational.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy { message } => write!(f, "unhealthy: {}", message),
            HealthStatus::Unreachable { message } => write!(f, "error: {}", message),
        }
    }
}
