use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DataModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDataModel {
    pub name: String,
    pub description: Option<String>,
}

/// `project_id` is fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataModelPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}
