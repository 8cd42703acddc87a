use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const CARDINALITIES: [&str; 3] = ["one_to_one", "one_to_many", "many_to_many"];
pub const ON_DELETE_ACTIONS: [&str; 4] = ["cascade", "restrict", "set null", "no action"];

/// Relationship between two entities of the same data model, optionally
/// pinned to a column on each side.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Referential {
    pub id: Uuid,
    pub data_model_id: Uuid,
    pub name: String,
    pub source_entity_id: Uuid,
    pub source_attribute_id: Option<Uuid>,
    pub target_entity_id: Uuid,
    pub target_attribute_id: Option<Uuid>,
    pub cardinality: String,
    pub on_delete: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_cardinality() -> String {
    "one_to_many".to_string()
}

fn default_on_delete() -> String {
    "no action".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReferential {
    pub name: String,
    pub source_entity_id: Uuid,
    pub source_attribute_id: Option<Uuid>,
    pub target_entity_id: Uuid,
    pub target_attribute_id: Option<Uuid>,
    #[serde(default = "default_cardinality")]
    pub cardinality: String,
    #[serde(default = "default_on_delete")]
    pub on_delete: String,
    pub description: Option<String>,
}

/// Endpoints are fixed once created; delete and recreate to move one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferentialPatch {
    pub name: Option<String>,
    pub cardinality: Option<String>,
    pub on_delete: Option<String>,
    pub description: Option<String>,
}
