use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccessStore, ProjectOwnership, StoreError};
use crate::access::role::Role;

/// Snapshot of access-relevant rows, as loaded by `modeler access check`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessFixture {
    #[serde(default)]
    pub projects: Vec<FixtureProject>,
    #[serde(default)]
    pub data_models: Vec<FixtureDataModel>,
    #[serde(default)]
    pub entities: Vec<FixtureEntity>,
    #[serde(default)]
    pub members: Vec<FixtureMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureProject {
    pub id: Uuid,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDataModel {
    pub id: Uuid,
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEntity {
    pub id: Uuid,
    pub data_model_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Default)]
struct Tables {
    projects: HashMap<Uuid, Uuid>,
    data_models: HashMap<Uuid, Uuid>,
    entities: HashMap<Uuid, Uuid>,
    members: HashMap<(Uuid, Uuid), Role>,
}

/// In-process access store. Membership is keyed by (project, user), so a
/// second grant for the same pair replaces the first.
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    tables: RwLock<Tables>,
}

impl MemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: AccessFixture) -> Self {
        let mut tables = Tables::default();
        for project in fixture.projects {
            tables.projects.insert(project.id, project.created_by);
        }
        for model in fixture.data_models {
            tables.data_models.insert(model.id, model.project_id);
        }
        for entity in fixture.entities {
            tables.entities.insert(entity.id, entity.data_model_id);
        }
        for member in fixture.members {
            tables.members.insert((member.project_id, member.user_id), member.role);
        }
        Self { tables: RwLock::new(tables) }
    }

    pub async fn insert_project(&self, project_id: Uuid, created_by: Uuid) {
        self.tables.write().await.projects.insert(project_id, created_by);
    }

    pub async fn insert_data_model(&self, data_model_id: Uuid, project_id: Uuid) {
        self.tables.write().await.data_models.insert(data_model_id, project_id);
    }

    pub async fn insert_entity(&self, entity_id: Uuid, data_model_id: Uuid) {
        self.tables.write().await.entities.insert(entity_id, data_model_id);
    }

    /// Add or change a membership. Returns the previous role, if any.
    pub async fn set_member(&self, project_id: Uuid, user_id: Uuid, role: Role) -> Option<Role> {
        self.tables.write().await.members.insert((project_id, user_id), role)
    }

    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Option<Role> {
        self.tables.write().await.members.remove(&(project_id, user_id))
    }

    /// Drops only the project row; models pointing at it are left dangling.
    pub async fn remove_project(&self, project_id: Uuid) {
        self.tables.write().await.projects.remove(&project_id);
    }

    pub async fn remove_data_model(&self, data_model_id: Uuid) {
        self.tables.write().await.data_models.remove(&data_model_id);
    }
}

#[async_trait]
impl AccessStore for MemoryAccessStore {
    async fn find_project(&self, project_id: Uuid) -> Result<Option<ProjectOwnership>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .get(&project_id)
            .map(|created_by| ProjectOwnership { project_id, created_by: *created_by }))
    }

    async fn find_data_model_project(&self, data_model_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.tables.read().await.data_models.get(&data_model_id).copied())
    }

    async fn find_entity_data_model(&self, entity_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.tables.read().await.entities.get(&entity_id).copied())
    }

    async fn find_membership_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError> {
        Ok(self.tables.read().await.members.get(&(project_id, user_id)).copied())
    }
}
