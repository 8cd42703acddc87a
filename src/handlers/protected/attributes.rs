use std::collections::HashMap;

use axum::extract::{Extension, Path, State};
use axum::Json;

use super::utils::{path_id, validate_name, validate_optional_name};
use crate::access::Permit;
use crate::database::models::{Attribute, AttributePatch, NewAttribute};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::services::AttributeService;
use crate::state::AppState;

fn validate_data_type(data_type: &str) -> Result<(), ApiError> {
    if data_type.trim().is_empty() {
        return Err(ApiError::field_error("data_type", "must not be empty"));
    }
    Ok(())
}

/// GET /api/entities/:entity_id/attributes
pub async fn list(State(state): State<AppState>, Extension(permit): Extension<Permit>) -> ApiResult<Vec<Attribute>> {
    let attributes = AttributeService::new(state.pool).list_by_entity(permit.resource.id()).await?;
    Ok(attributes.into_api_response())
}

/// POST /api/entities/:entity_id/attributes
pub async fn create(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Json(input): Json<NewAttribute>,
) -> ApiResult<Attribute> {
    validate_name("name", &input.name)?;
    validate_data_type(&input.data_type)?;
    let attribute = AttributeService::new(state.pool).create(permit.resource.id(), input).await?;
    Ok(ApiResponse::created(attribute))
}

/// PATCH /api/entities/:entity_id/attributes/:attribute_id
pub async fn update(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
    Json(patch): Json<AttributePatch>,
) -> ApiResult<Attribute> {
    let attribute_id = path_id(&params, "attribute_id")?;
    validate_optional_name("name", patch.name.as_ref())?;
    if let Some(data_type) = &patch.data_type {
        validate_data_type(data_type)?;
    }
    let attribute = AttributeService::new(state.pool)
        .update(permit.resource.id(), attribute_id, patch)
        .await?;
    Ok(attribute.into_api_response())
}

/// DELETE /api/entities/:entity_id/attributes/:attribute_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<()> {
    let attribute_id = path_id(&params, "attribute_id")?;
    AttributeService::new(state.pool).delete(permit.resource.id(), attribute_id).await?;
    Ok(ApiResponse::no_content())
}
