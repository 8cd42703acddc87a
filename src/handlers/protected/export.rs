use axum::{
    extract::{Extension, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::access::Permit;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::{ExportFormat, ExportService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /api/models/:model_id/export?format=json|sql
pub async fn export(
    State(state): State<AppState>,
    Extension(permit): Extension<Permit>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let export = ExportService::new(state.pool).load(permit.resource.id()).await?;

    Ok(match query.format {
        ExportFormat::Json => ApiResponse::success(export).into_response(),
        ExportFormat::Sql => (
            [(header::CONTENT_TYPE, "application/sql; charset=utf-8")],
            export.to_sql(),
        )
            .into_response(),
    })
}
