use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AccessError;

/// Reference to a resource that sits on the project ownership chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    Project(Uuid),
    DataModel(Uuid),
    Entity(Uuid),
}

/// Path parameters that identify a resource, most specific first.
const PATH_KEYS: [&str; 3] = ["entity_id", "model_id", "project_id"];

impl ResourceRef {
    pub fn id(&self) -> Uuid {
        match self {
            ResourceRef::Project(id) | ResourceRef::DataModel(id) | ResourceRef::Entity(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRef::Project(_) => "project",
            ResourceRef::DataModel(_) => "data model",
            ResourceRef::Entity(_) => "entity",
        }
    }

    /// Build a reference from a kind label as used in URLs and on the CLI.
    pub fn parse(kind: &str, id: &str) -> Result<Self, AccessError> {
        let make: fn(Uuid) -> ResourceRef = match kind {
            "project" | "projects" => ResourceRef::Project,
            "model" | "models" | "data_model" | "data-model" => ResourceRef::DataModel,
            "entity" | "entities" => ResourceRef::Entity,
            other => return Err(AccessError::NotFound(format!("resource kind '{}'", other))),
        };
        let id = Uuid::parse_str(id)
            .map_err(|_| AccessError::NotFound(format!("{} '{}'", kind, id)))?;
        Ok(make(id))
    }

    /// Pick the resource a route is about from its path parameters.
    ///
    /// `/api/entities/:entity_id/attributes/:attribute_id` is authorized
    /// through the entity, `/api/projects/:project_id/members/:user_id`
    /// through the project.
    pub fn from_path_params(params: &HashMap<String, String>) -> Result<Self, AccessError> {
        for key in PATH_KEYS {
            if let Some(raw) = params.get(key) {
                let kind = key.trim_end_matches("_id");
                return Self::parse(kind, raw);
            }
        }
        Err(AccessError::ResolutionFailed(
            "route carries no project, model or entity id".to_string(),
        ))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}
