use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccessStore, ProjectOwnership, StoreError};
use crate::access::role::Role;
use crate::database::DatabaseError;

/// Access lookups against the `projects`, `data_models`, `entities` and
/// `project_members` tables.
#[derive(Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn find_project(&self, project_id: Uuid) -> Result<Option<ProjectOwnership>, StoreError> {
        let row: Option<(Uuid, Uuid)> =
            sqlx::query_as("SELECT id, created_by FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

        Ok(row.map(|(project_id, created_by)| ProjectOwnership { project_id, created_by }))
    }

    async fn find_data_model_project(&self, data_model_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT project_id FROM data_models WHERE id = $1")
            .bind(data_model_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        Ok(row.map(|(project_id,)| project_id))
    }

    async fn find_entity_data_model(&self, entity_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT data_model_id FROM entities WHERE id = $1")
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        Ok(row.map(|(data_model_id,)| data_model_id))
    }

    async fn find_membership_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        // A role the table should never hold is an integrity failure, not "no access".
        row.map(|(role,)| {
            role.parse::<Role>().map_err(|e| {
                tracing::error!("Membership {}/{} holds {}", project_id, user_id, e);
                StoreError::Corrupt(format!("membership {}/{}: {}", project_id, user_id, e))
            })
        })
        .transpose()
    }
}
