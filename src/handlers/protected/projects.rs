use axum::extract::{Extension, State};
use axum::Json;

use super::utils::{validate_name, validate_optional_name};
use crate::access::Permit;
use crate::database::models::{NewProject, Project, ProjectPatch};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IntoApiResponse};
use crate::services::ProjectService;
use crate::state::AppState;

/// GET /api/projects - Projects visible to the caller
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Project>> {
    let projects = ProjectService::new(state.pool).list_for(&user.identity).await?;
    Ok(projects.into_api_response())
}

/// POST /api/projects - Create a project owned by the caller
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewProject>,
) -> ApiResult<Project> {
    validate_name("name", &input.name)?;
    let project = ProjectService::new(state.pool).create(user.identity.id, input).await?;
    Ok(ApiResponse::created(project))
}

/// GET /api/projects/:project_id
pub async fn get(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<Project> {
    let project = ProjectService::new(state.pool).get(permit.project_id).await?;
    Ok(project.into_api_response())
}

/// PATCH /api/projects/:project_id
pub async fn update(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<Project> {
    validate_optional_name("name", patch.name.as_ref())?;
    let project = ProjectService::new(state.pool).update(permit.project_id, patch).await?;
    Ok(project.into_api_response())
}

/// DELETE /api/projects/:project_id - Removes models, entities, attributes and memberships with it
pub async fn delete(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<()> {
    ProjectService::new(state.pool).delete(permit.project_id).await?;
    Ok(ApiResponse::no_content())
}
