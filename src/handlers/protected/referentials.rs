use std::collections::HashMap;

use axum::extract::{Extension, Path, State};
use axum::Json;

use super::utils::{path_id, validate_choice, validate_name, validate_optional_name};
use crate::access::Permit;
use crate::database::models::{NewReferential, Referential, ReferentialPatch, CARDINALITIES, ON_DELETE_ACTIONS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::services::ReferentialService;
use crate::state::AppState;

fn validate_kinds(cardinality: Option<&str>, on_delete: Option<&str>) -> Result<(), ApiError> {
    if let Some(cardinality) = cardinality {
        validate_choice("cardinality", cardinality, &CARDINALITIES)?;
    }
    if let Some(on_delete) = on_delete {
        validate_choice("on_delete", on_delete, &ON_DELETE_ACTIONS)?;
    }
    Ok(())
}

/// GET /api/models/:model_id/referentials
pub async fn list(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
) -> ApiResult<Vec<Referential>> {
    let referentials = ReferentialService::new(state.pool).list_by_model(permit.resource.id()).await?;
    Ok(referentials.into_api_response())
}

/// POST /api/models/:model_id/referentials
pub async fn create(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(input): Json<NewReferential>,
) -> ApiResult<Referential> {
    validate_name("name", &input.name)?;
    validate_kinds(Some(input.cardinality.as_str()), Some(input.on_delete.as_str()))?;

    let referential = ReferentialService::new(state.pool).create(permit.resource.id(), input).await?;
    Ok(ApiResponse::created(referential))
}

/// GET /api/models/:model_id/referentials/:referential_id
pub async fn get(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Referential> {
    let referential_id = path_id(&params, "referential_id")?;
    let referential = ReferentialService::new(state.pool)
        .get(permit.resource.id(), referential_id)
        .await?;
    Ok(referential.into_api_response())
}

/// PATCH /api/models/:model_id/referentials/:referential_id
pub async fn update(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
    Json(patch): Json<ReferentialPatch>,
) -> ApiResult<Referential> {
    let referential_id = path_id(&params, "referential_id")?;
    validate_optional_name("name", patch.name.as_ref())?;
    validate_kinds(patch.cardinality.as_deref(), patch.on_delete.as_deref())?;

    let referential = ReferentialService::new(state.pool)
        .update(permit.resource.id(), referential_id, patch)
        .await?;
    Ok(referential.into_api_response())
}

/// DELETE /api/models/:model_id/referentials/:referential_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let referential_id = path_id(&params, "referential_id")?;
    ReferentialService::new(state.pool).delete(permit.resource.id(), referential_id).await?;
    Ok(ApiResponse::no_content())
}
