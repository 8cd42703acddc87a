use std::collections::HashMap;

use axum::extract::{Extension, Path, State};
use axum::Json;

use super::utils::{parse_role, path_id};
use crate::access::Permit;
use crate::database::models::{AddMember, ChangeAccess, ProjectMember};
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::services::MemberService;
use crate::state::AppState;

/// GET /api/projects/:project_id/members
pub async fn list(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
) -> ApiResult<Vec<ProjectMember>> {
    let members = MemberService::new(state.pool).list(permit.project_id).await?;
    Ok(members.into_api_response())
}

/// POST /api/projects/:project_id/members - Add user (admin)
pub async fn add(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(input): Json<AddMember>,
) -> ApiResult<ProjectMember> {
    let role = parse_role(&input.role)?;
    let member = MemberService::new(state.pool)
        .add(permit.project_id, input.user_id, role)
        .await?;
    Ok(ApiResponse::created(member))
}

/// PATCH /api/projects/:project_id/members/:user_id - Change access (admin)
pub async fn change_access(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
    Json(input): Json<ChangeAccess>,
) -> ApiResult<ProjectMember> {
    let user_id = path_id(&params, "user_id")?;
    let role = parse_role(&input.role)?;
    let member = MemberService::new(state.pool)
        .change_role(permit.project_id, user_id, role)
        .await?;
    Ok(member.into_api_response())
}

/// DELETE /api/projects/:project_id/members/:user_id - Remove user (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let user_id = path_id(&params, "user_id")?;
    MemberService::new(state.pool).remove(permit.project_id, user_id).await?;
    Ok(ApiResponse::no_content())
}
