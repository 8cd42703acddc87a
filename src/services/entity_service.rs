use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Entity, EntityPatch, NewEntity};
use crate::database::DatabaseError;

const ENTITY_COLUMNS: &str = "id, data_model_id, name, description, created_at, updated_at";

pub struct EntityService {
    pool: PgPool,
}

impl EntityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_model(&self, model_id: Uuid) -> Result<Vec<Entity>, DatabaseError> {
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE data_model_id = $1 ORDER BY name");

        let entities = sqlx::query_as::<_, Entity>(&sql)
            .bind(model_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities)
    }

    pub async fn create(&self, model_id: Uuid, input: NewEntity) -> Result<Entity, DatabaseError> {
        let sql = format!(
            "INSERT INTO entities (id, data_model_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {ENTITY_COLUMNS}"
        );

        let entity = sqlx::query_as::<_, Entity>(&sql)
            .bind(Uuid::new_v4())
            .bind(model_id)
            .bind(input.name)
            .bind(input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity)
    }

    pub async fn get(&self, entity_id: Uuid) -> Result<Entity, DatabaseError> {
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = $1");

        sqlx::query_as::<_, Entity>(&sql)
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("entity {}", entity_id)))
    }

    pub async fn update(&self, entity_id: Uuid, patch: EntityPatch) -> Result<Entity, DatabaseError> {
        let sql = format!(
            "UPDATE entities
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = now()
             WHERE id = $1
             RETURNING {ENTITY_COLUMNS}"
        );

        sqlx::query_as::<_, Entity>(&sql)
            .bind(entity_id)
            .bind(patch.name)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("entity {}", entity_id)))
    }

    pub async fn delete(&self, entity_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(entity_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("entity {}", entity_id)));
        }
        Ok(())
    }
}
