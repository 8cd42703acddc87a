use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::access::{AccessGate, AccessStore, MemoryAccessStore, ProjectOwnership, Role, RoleResolver, StoreError};
use crate::auth::Identity;

/// Shared access fixture: project created by `creator`, with one data model
/// holding one entity; `editor` and `viewer` are members, `outsider` is not,
/// `superuser` has the global flag and no membership.
pub struct Scenario {
    pub store: Arc<MemoryAccessStore>,
    pub project: Uuid,
    pub model: Uuid,
    pub entity: Uuid,
    pub creator: Uuid,
    pub editor: Uuid,
    pub viewer: Uuid,
    pub outsider: Uuid,
    pub superuser: Uuid,
}

impl Scenario {
    pub async fn build() -> Self {
        let store = Arc::new(MemoryAccessStore::new());
        let scenario = Self {
            store: store.clone(),
            project: Uuid::new_v4(),
            model: Uuid::new_v4(),
            entity: Uuid::new_v4(),
            creator: Uuid::new_v4(),
            editor: Uuid::new_v4(),
            viewer: Uuid::new_v4(),
            outsider: Uuid::new_v4(),
            superuser: Uuid::new_v4(),
        };

        store.insert_project(scenario.project, scenario.creator).await;
        store.insert_data_model(scenario.model, scenario.project).await;
        store.insert_entity(scenario.entity, scenario.model).await;
        store.set_member(scenario.project, scenario.editor, Role::Editor).await;
        store.set_member(scenario.project, scenario.viewer, Role::Viewer).await;

        scenario
    }

    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(self.store.clone())
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.store.clone())
    }

    pub fn creator(&self) -> Identity {
        Identity::user(self.creator)
    }

    pub fn editor(&self) -> Identity {
        Identity::user(self.editor)
    }

    pub fn viewer(&self) -> Identity {
        Identity::user(self.viewer)
    }

    pub fn outsider(&self) -> Identity {
        Identity::user(self.outsider)
    }

    pub fn superuser(&self) -> Identity {
        Identity { id: self.superuser, is_superuser: true }
    }

    pub fn everyone(&self) -> Vec<Identity> {
        vec![self.creator(), self.editor(), self.viewer(), self.outsider(), self.superuser()]
    }
}

/// Store whose every lookup fails, as when the database is unreachable.
pub struct FailingStore;

impl FailingStore {
    pub const REASON: &'static str = "connection refused by 10.0.0.7:5432";

    fn fail<T>() -> Result<T, StoreError> {
        Err(StoreError::Corrupt(Self::REASON.to_string()))
    }
}

#[async_trait]
impl AccessStore for FailingStore {
    async fn find_project(&self, _project_id: Uuid) -> Result<Option<ProjectOwnership>, StoreError> {
        Self::fail()
    }

    async fn find_data_model_project(&self, _data_model_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Self::fail()
    }

    async fn find_entity_data_model(&self, _entity_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Self::fail()
    }

    async fn find_membership_role(&self, _project_id: Uuid, _user_id: Uuid) -> Result<Option<Role>, StoreError> {
        Self::fail()
    }
}
