use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while bridging a request to the cluster or
/// to the AAP controller. Each variant knows which HTTP status it maps to.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Misconfigured(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Not Found: No job template found with name '{name}'.")]
    TemplateNotFound { name: String },

    #[error("Conflict: Multiple job templates found with name '{name}' ({count} matches).")]
    AmbiguousTemplate { name: String, count: u64 },

    #[error("Service Unavailable: {action}. Error: {detail}")]
    ServiceUnavailable { action: &'static str, detail: String },

    #[error("Kubernetes API Error: Failed to create VM. Reason: {reason}")]
    Orchestration { status: u16, reason: String },

    #[error("Could not configure kubernetes client: {0}")]
    ClusterDiscovery(String),
}

impl BridgeError {
    pub const LOOKUP_FAILED: &'static str = "Could not connect to AAP";
    pub const LAUNCH_FAILED: &'static str = "Failed to launch job in AAP";

    pub fn lookup_failed(detail: impl ToString) -> Self {
        BridgeError::ServiceUnavailable {
            action: Self::LOOKUP_FAILED,
            detail: detail.to_string(),
        }
    }

    pub fn launch_failed(detail: impl ToString) -> Self {
        BridgeError::ServiceUnavailable {
            action: Self::LAUNCH_FAILED,
            detail: detail.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Misconfigured(_) | BridgeError::ClusterDiscovery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            BridgeError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BridgeError::TemplateNotFound { .. } => StatusCode::NOT_FOUND,
            BridgeError::AmbiguousTemplate { .. } => StatusCode::CONFLICT,
            BridgeError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            // the cluster's own status is passed through untouched
            BridgeError::Orchestration { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
