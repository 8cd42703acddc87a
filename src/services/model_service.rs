use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{DataModel, DataModelPatch, NewDataModel};
use crate::database::DatabaseError;

const MODEL_COLUMNS: &str = "id, project_id, name, description, created_at, updated_at";

pub struct ModelService {
    pool: PgPool,
}

impl ModelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<DataModel>, DatabaseError> {
        let sql = format!("SELECT {MODEL_COLUMNS} FROM data_models WHERE project_id = $1 ORDER BY name");

        let models = sqlx::query_as::<_, DataModel>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(models)
    }

    pub async fn create(&self, project_id: Uuid, input: NewDataModel) -> Result<DataModel, DatabaseError> {
        let sql = format!(
            "INSERT INTO data_models (id, project_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {MODEL_COLUMNS}"
        );

        let model = sqlx::query_as::<_, DataModel>(&sql)
            .bind(Uuid::new_v4())
            .bind(project_id)
            .bind(input.name)
            .bind(input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(model)
    }

    pub async fn get(&self, model_id: Uuid) -> Result<DataModel, DatabaseError> {
        let sql = format!("SELECT {MODEL_COLUMNS} FROM data_models WHERE id = $1");

        sqlx::query_as::<_, DataModel>(&sql)
            .bind(model_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("data model {}", model_id)))
    }

    pub async fn update(&self, model_id: Uuid, patch: DataModelPatch) -> Result<DataModel, DatabaseError> {
        let sql = format!(
            "UPDATE data_models
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = now()
             WHERE id = $1
             RETURNING {MODEL_COLUMNS}"
        );

        sqlx::query_as::<_, DataModel>(&sql)
            .bind(model_id)
            .bind(patch.name)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("data model {}", model_id)))
    }

    pub async fn delete(&self, model_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM data_models WHERE id = $1")
            .bind(model_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("data model {}", model_id)));
        }
        Ok(())
    }
}
