use axum::extract::{Extension, State};
use axum::Json;

use super::utils::{validate_name, validate_optional_name};
use crate::access::Permit;
use crate::database::models::{Entity, EntityPatch, NewEntity};
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::services::EntityService;
use crate::state::AppState;

/// GET /api/models/:model_id/entities
pub async fn list(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<Vec<Entity>> {
    let entities = EntityService::new(state.pool).list_by_model(permit.resource.id()).await?;
    Ok(entities.into_api_response())
}

/// POST /api/models/:model_id/entities
pub async fn create(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(input): Json<NewEntity>,
) -> ApiResult<Entity> {
    validate_name("name", &input.name)?;
    let entity = EntityService::new(state.pool).create(permit.resource.id(), input).await?;
    Ok(ApiResponse::created(entity))
}

/// GET /api/entities/:entity_id
pub async fn get(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<Entity> {
    let entity = EntityService::new(state.pool).get(permit.resource.id()).await?;
    Ok(entity.into_api_response())
}

/// PATCH /api/entities/:entity_id
pub async fn update(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(patch): Json<EntityPatch>,
) -> ApiResult<Entity> {
    validate_optional_name("name", patch.name.as_ref())?;
    let entity = EntityService::new(state.pool).update(permit.resource.id(), patch).await?;
    Ok(entity.into_api_response())
}

/// DELETE /api/entities/:entity_id
pub async fn delete(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<()> {
    EntityService::new(state.pool).delete(permit.resource.id()).await?;
    Ok(ApiResponse::no_content())
}
