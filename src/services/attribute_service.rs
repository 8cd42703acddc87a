use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Attribute, AttributePatch, NewAttribute};
use crate::database::DatabaseError;

const ATTRIBUTE_COLUMNS: &str =
    "id, entity_id, name, data_type, is_nullable, is_primary_key, description, created_at, updated_at";

/// Attributes are always addressed through their entity, so every query is
/// scoped by `entity_id` as well as the attribute id.
pub struct AttributeService {
    pool: PgPool,
}

impl AttributeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_entity(&self, entity_id: Uuid) -> Result<Vec<Attribute>, DatabaseError> {
        let sql = format!(
            "SELECT {ATTRIBUTE_COLUMNS} FROM attributes
             WHERE entity_id = $1
             ORDER BY is_primary_key DESC, created_at"
        );

        let attributes = sqlx::query_as::<_, Attribute>(&sql)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(attributes)
    }

    pub async fn create(&self, entity_id: Uuid, input: NewAttribute) -> Result<Attribute, DatabaseError> {
        let sql = format!(
            "INSERT INTO attributes (id, entity_id, name, data_type, is_nullable, is_primary_key, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ATTRIBUTE_COLUMNS}"
        );

        let attribute = sqlx::query_as::<_, Attribute>(&sql)
            .bind(Uuid::new_v4())
            .bind(entity_id)
            .bind(input.name)
            .bind(input.data_type)
            .bind(input.is_nullable)
            .bind(input.is_primary_key)
            .bind(input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(attribute)
    }

    pub async fn update(
        &self,
        entity_id: Uuid,
        attribute_id: Uuid,
        patch: AttributePatch,
    ) -> Result<Attribute, DatabaseError> {
        let sql = format!(
            "UPDATE attributes
             SET name = COALESCE($3, name),
                 data_type = COALESCE($4, data_type),
                 is_nullable = COALESCE($5, is_nullable),
                 is_primary_key = COALESCE($6, is_primary_key),
                 description = COALESCE($7, description),
                 updated_at = now()
             WHERE id = $1 AND entity_id = $2
             RETURNING {ATTRIBUTE_COLUMNS}"
        );

        sqlx::query_as::<_, Attribute>(&sql)
            .bind(attribute_id)
            .bind(entity_id)
            .bind(patch.name)
            .bind(patch.data_type)
            .bind(patch.is_nullable)
            .bind(patch.is_primary_key)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("attribute {}", attribute_id)))
    }

    pub async fn delete(&self, entity_id: Uuid, attribute_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM attributes WHERE id = $1 AND entity_id = $2")
            .bind(attribute_id)
            .bind(entity_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("attribute {}", attribute_id)));
        }
        Ok(())
    }
}
