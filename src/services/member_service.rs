use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::access::Role;
use crate::database::models::ProjectMember;
use crate::database::DatabaseError;

const MEMBER_COLUMNS: &str = "id, project_id, user_id, role, created_at";

#[derive(FromRow)]
struct MemberRow {
    id: Uuid,
    project_id: Uuid,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for ProjectMember {
    type Error = DatabaseError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|e| {
            tracing::error!("Membership {} holds {}", row.id, e);
            DatabaseError::Sqlx(sqlx::Error::Decode(Box::new(e)))
        })?;

        Ok(ProjectMember {
            id: row.id,
            project_id: row.project_id,
            user_id: row.user_id,
            role,
            created_at: row.created_at,
        })
    }
}

/// Access management: the only writer of `project_members`.
pub struct MemberService {
    pool: PgPool,
}

impl MemberService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, DatabaseError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM project_members WHERE project_id = $1 ORDER BY created_at"
        );

        sqlx::query_as::<_, MemberRow>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ProjectMember::try_from)
            .collect()
    }

    /// Add user. The creator already holds implicit admin and cannot be added;
    /// a second row for the same user is a conflict.
    pub async fn add(&self, project_id: Uuid, user_id: Uuid, role: Role) -> Result<ProjectMember, DatabaseError> {
        let creator: Option<(Uuid,)> = sqlx::query_as("SELECT created_by FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;

        match creator {
            None => return Err(DatabaseError::NotFound(format!("project {}", project_id))),
            Some((created_by,)) if created_by == user_id => {
                return Err(DatabaseError::Conflict(
                    "the project creator is already an admin".to_string(),
                ))
            }
            Some(_) => {}
        }

        let sql = format!(
            "INSERT INTO project_members (id, project_id, user_id, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {MEMBER_COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from);

        let row = match inserted {
            Err(e) if e.is_unique_violation() => {
                return Err(DatabaseError::Conflict(format!(
                    "user {} is already a member of project {}",
                    user_id, project_id
                )))
            }
            other => other?,
        };

        tracing::info!("Added {} to project {} as {}", user_id, project_id, role);
        ProjectMember::try_from(row)
    }

    /// Change access.
    pub async fn change_role(&self, project_id: Uuid, user_id: Uuid, role: Role) -> Result<ProjectMember, DatabaseError> {
        let sql = format!(
            "UPDATE project_members SET role = $3
             WHERE project_id = $1 AND user_id = $2
             RETURNING {MEMBER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("membership of {} in project {}", user_id, project_id)))?;

        tracing::info!("Changed {} in project {} to {}", user_id, project_id, role);
        ProjectMember::try_from(row)
    }

    /// Remove user.
    pub async fn remove(&self, project_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "membership of {} in project {}",
                user_id, project_id
            )));
        }

        tracing::info!("Removed {} from project {}", user_id, project_id);
        Ok(())
    }
}
