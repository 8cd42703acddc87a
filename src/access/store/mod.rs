//! Read-only lookups the resolver needs from persisted state.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::access::role::Role;
use crate::database::DatabaseError;

pub use memory::{AccessFixture, FixtureDataModel, FixtureEntity, FixtureMember, FixtureProject, MemoryAccessStore};
pub use postgres::PgAccessStore;

/// The two project columns that matter for access decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOwnership {
    pub project_id: Uuid,
    pub created_by: Uuid,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("corrupt access record: {0}")]
    Corrupt(String),
}

/// Each method is a single lookup; `Ok(None)` means the row does not exist.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn find_project(&self, project_id: Uuid) -> Result<Option<ProjectOwnership>, StoreError>;

    /// Owning project of a data model.
    async fn find_data_model_project(&self, data_model_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Owning data model of an entity.
    async fn find_entity_data_model(&self, entity_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    async fn find_membership_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError>;
}
