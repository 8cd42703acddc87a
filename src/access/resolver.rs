use std::sync::Arc;

use uuid::Uuid;

use super::error::AccessError;
use super::resource::ResourceRef;
use super::role::Role;
use super::store::{AccessStore, ProjectOwnership};
use crate::auth::Identity;

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub role: Role,
    pub project_id: Uuid,
}

/// Decides which role an identity holds on the project owning a resource.
///
/// Precedence, first match wins: superuser, project creator, membership row.
/// Resolution only reads from the store and keeps no state between calls.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn AccessStore>,
}

impl RoleResolver {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_role(
        &self,
        identity: Option<&Identity>,
        resource: ResourceRef,
    ) -> Result<Role, AccessError> {
        self.resolve(identity, resource).await.map(|resolution| resolution.role)
    }

    pub async fn resolve(
        &self,
        identity: Option<&Identity>,
        resource: ResourceRef,
    ) -> Result<Resolution, AccessError> {
        let identity = identity.ok_or(AccessError::Unauthenticated)?;
        let project = self.owning_project(resource).await?;

        let role = if identity.is_superuser || identity.id == project.created_by {
            Role::Admin
        } else {
            self.store
                .find_membership_role(project.project_id, identity.id)
                .await?
                .ok_or(AccessError::NotMember { project_id: project.project_id })?
        };

        Ok(Resolution { role, project_id: project.project_id })
    }

    /// Walk entity -> data model -> project. A missing row at any hop is `NotFound`.
    pub async fn owning_project(&self, resource: ResourceRef) -> Result<ProjectOwnership, AccessError> {
        let project_id = match resource {
            ResourceRef::Project(id) => id,
            ResourceRef::DataModel(id) => self.data_model_project(id).await?,
            ResourceRef::Entity(id) => {
                let data_model_id = self
                    .store
                    .find_entity_data_model(id)
                    .await?
                    .ok_or_else(|| AccessError::NotFound(resource.to_string()))?;
                self.data_model_project(data_model_id).await?
            }
        };

        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(ResourceRef::Project(project_id).to_string()))
    }

    async fn data_model_project(&self, data_model_id: Uuid) -> Result<Uuid, AccessError> {
        self.store
            .find_data_model_project(data_model_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(ResourceRef::DataModel(data_model_id).to_string()))
    }
}
