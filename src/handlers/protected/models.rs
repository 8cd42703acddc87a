use axum::extract::{Extension, State};
use axum::Json;

use super::utils::{validate_name, validate_optional_name};
use crate::access::Permit;
use crate::database::models::{DataModel, DataModelPatch, NewDataModel};
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::services::ModelService;
use crate::state::AppState;

/// GET /api/projects/:project_id/models
pub async fn list(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<Vec<DataModel>> {
    let models = ModelService::new(state.pool).list_by_project(permit.project_id).await?;
    Ok(models.into_api_response())
}

/// POST /api/projects/:project_id/models
pub async fn create(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(input): Json<NewDataModel>,
) -> ApiResult<DataModel> {
    validate_name("name", &input.name)?;
    let model = ModelService::new(state.pool).create(permit.project_id, input).await?;
    Ok(ApiResponse::created(model))
}

/// GET /api/models/:model_id
pub async fn get(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<DataModel> {
    let model = ModelService::new(state.pool).get(permit.resource.id()).await?;
    Ok(model.into_api_response())
}

/// PATCH /api/models/:model_id
pub async fn update(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(patch): Json<DataModelPatch>,
) -> ApiResult<DataModel> {
    validate_optional_name("name", patch.name.as_ref())?;
    let model = ModelService::new(state.pool).update(permit.resource.id(), patch).await?;
    Ok(model.into_api_response())
}

/// DELETE /api/models/:model_id
pub async fn delete(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<()> {
    ModelService::new(state.pool).delete(permit.resource.id()).await?;
    Ok(ApiResponse::no_content())
}
