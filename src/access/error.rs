use axum::http::Method;
use thiserror::Error;
use uuid::Uuid;

use super::role::Role;
use super::store::StoreError;

/// Reasons the gate refuses a request.
///
/// The first four are the caller's to fix (credentials, ids, membership);
/// `ResolutionFailed` is an infrastructure failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Not a member of project {project_id}")]
    NotMember { project_id: Uuid },

    #[error("Insufficient permissions: role '{role}' cannot {method}")]
    InsufficientPermission { role: Role, method: Method },

    #[error("Access resolution failed: {0}")]
    ResolutionFailed(String),
}

impl AccessError {
    /// Stable label for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "unauthenticated",
            AccessError::NotFound(_) => "not_found",
            AccessError::NotMember { .. } => "not_member",
            AccessError::InsufficientPermission { .. } => "insufficient_permission",
            AccessError::ResolutionFailed(_) => "resolution_failed",
        }
    }

    /// Role the caller held when refused, if resolution got that far.
    pub fn role(&self) -> Option<Role> {
        match self {
            AccessError::InsufficientPermission { role, .. } => Some(*role),
            _ => None,
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        AccessError::ResolutionFailed(err.to_string())
    }
}
