use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::access::{allowed_methods, ResourceRef, Role};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// What the caller may do on one resource.
#[derive(Debug, Serialize)]
pub struct AccessReport {
    pub resource: ResourceRef,
    pub role: Role,
    pub project_id: Uuid,
    pub allowed_methods: Vec<String>,
}

/// GET /api/access/:kind/:id - Resolve the caller's role on a resource
///
/// `kind` is `project`, `model` or `entity`. Refusals are reported exactly
/// as the gate would report them on the resource's own routes.
pub async fn probe(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    user: AuthUser,
) -> ApiResult<AccessReport> {
    let conceal = state.security.conceal_inaccessible_resources;

    let resource = ResourceRef::parse(&kind, &id).map_err(|e| ApiError::from_access(e, conceal))?;
    let resolution = state
        .gate
        .resolver()
        .resolve(Some(&user.identity), resource)
        .await
        .map_err(|e| ApiError::from_access(e, conceal))?;

    Ok(ApiResponse::success(AccessReport {
        resource,
        role: resolution.role,
        project_id: resolution.project_id,
        allowed_methods: allowed_methods(resolution.role),
    }))
}
