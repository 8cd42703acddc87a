use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{NewProject, Project, ProjectPatch};
use crate::database::DatabaseError;

const PROJECT_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Projects the caller created or belongs to; superusers see every project.
    pub async fn list_for(&self, identity: &Identity) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p
             WHERE $2
                OR p.created_by = $1
                OR EXISTS (
                    SELECT 1 FROM project_members m
                    WHERE m.project_id = p.id AND m.user_id = $1
                )
             ORDER BY p.created_at DESC"
        );

        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(identity.id)
            .bind(identity.is_superuser)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    /// The creator becomes implicit admin; no membership row is written.
    pub async fn create(&self, creator: Uuid, input: NewProject) -> Result<Project, DatabaseError> {
        let sql = format!(
            "INSERT INTO projects (id, name, description, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {PROJECT_COLUMNS}"
        );

        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.name)
            .bind(input.description)
            .bind(creator)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created project {} for {}", project.id, creator);
        Ok(project)
    }

    pub async fn get(&self, project_id: Uuid) -> Result<Project, DatabaseError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");

        sqlx::query_as::<_, Project>(&sql)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("project {}", project_id)))
    }

    pub async fn update(&self, project_id: Uuid, patch: ProjectPatch) -> Result<Project, DatabaseError> {
        let sql = format!(
            "UPDATE projects
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(project_id)
            .bind(patch.name)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("project {}", project_id)))
    }

    /// Members, models, entities and attributes go with it (ON DELETE CASCADE).
    pub async fn delete(&self, project_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("project {}", project_id)));
        }

        tracing::info!("Deleted project {}", project_id);
        Ok(())
    }
}
