use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{NewReferential, Referential, ReferentialPatch};
use crate::database::DatabaseError;

const REFERENTIAL_COLUMNS: &str = "id, data_model_id, name, source_entity_id, source_attribute_id, \
     target_entity_id, target_attribute_id, cardinality, on_delete, description, created_at, updated_at";

/// Referentials live under a data model and may only connect that model's
/// entities. Every query is scoped by `data_model_id`.
pub struct ReferentialService {
    pool: PgPool,
}

impl ReferentialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_model(&self, model_id: Uuid) -> Result<Vec<Referential>, DatabaseError> {
        let sql = format!(
            "SELECT {REFERENTIAL_COLUMNS} FROM referentials
             WHERE data_model_id = $1
             ORDER BY name, created_at"
        );

        let referentials = sqlx::query_as::<_, Referential>(&sql)
            .bind(model_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(referentials)
    }

    pub async fn get(&self, model_id: Uuid, referential_id: Uuid) -> Result<Referential, DatabaseError> {
        let sql = format!("SELECT {REFERENTIAL_COLUMNS} FROM referentials WHERE id = $1 AND data_model_id = $2");

        sqlx::query_as::<_, Referential>(&sql)
            .bind(referential_id)
            .bind(model_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("referential {}", referential_id)))
    }

    pub async fn create(&self, model_id: Uuid, input: NewReferential) -> Result<Referential, DatabaseError> {
        self.check_endpoint(model_id, input.source_entity_id, input.source_attribute_id).await?;
        self.check_endpoint(model_id, input.target_entity_id, input.target_attribute_id).await?;

        let sql = format!(
            "INSERT INTO referentials (id, data_model_id, name, source_entity_id, source_attribute_id,
                                       target_entity_id, target_attribute_id, cardinality, on_delete, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {REFERENTIAL_COLUMNS}"
        );

        let referential = sqlx::query_as::<_, Referential>(&sql)
            .bind(Uuid::new_v4())
            .bind(model_id)
            .bind(input.name)
            .bind(input.source_entity_id)
            .bind(input.source_attribute_id)
            .bind(input.target_entity_id)
            .bind(input.target_attribute_id)
            .bind(input.cardinality)
            .bind(input.on_delete)
            .bind(input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(referential)
    }

    pub async fn update(
        &self,
        model_id: Uuid,
        referential_id: Uuid,
        patch: ReferentialPatch,
    ) -> Result<Referential, DatabaseError> {
        let sql = format!(
            "UPDATE referentials
             SET name = COALESCE($3, name),
                 cardinality = COALESCE($4, cardinality),
                 on_delete = COALESCE($5, on_delete),
                 description = COALESCE($6, description),
                 updated_at = now()
             WHERE id = $1 AND data_model_id = $2
             RETURNING {REFERENTIAL_COLUMNS}"
        );

        sqlx::query_as::<_, Referential>(&sql)
            .bind(referential_id)
            .bind(model_id)
            .bind(patch.name)
            .bind(patch.cardinality)
            .bind(patch.on_delete)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("referential {}", referential_id)))
    }

    pub async fn delete(&self, model_id: Uuid, referential_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM referentials WHERE id = $1 AND data_model_id = $2")
            .bind(referential_id)
            .bind(model_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("referential {}", referential_id)));
        }
        Ok(())
    }

    /// The entity must belong to the model and the attribute, if any, to the entity.
    async fn check_endpoint(
        &self,
        model_id: Uuid,
        entity_id: Uuid,
        attribute_id: Option<Uuid>,
    ) -> Result<(), DatabaseError> {
        let in_model: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM entities WHERE id = $1 AND data_model_id = $2)",
        )
        .bind(entity_id)
        .bind(model_id)
        .fetch_one(&self.pool)
        .await?;

        if !in_model {
            return Err(DatabaseError::InvalidReference(format!(
                "entity {} is not part of data model {}",
                entity_id, model_id
            )));
        }

        let Some(attribute_id) = attribute_id else {
            return Ok(());
        };

        let on_entity: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM attributes WHERE id = $1 AND entity_id = $2)")
                .bind(attribute_id)
                .bind(entity_id)
                .fetch_one(&self.pool)
                .await?;

        if !on_entity {
            return Err(DatabaseError::InvalidReference(format!(
                "attribute {} does not belong to entity {}",
                attribute_id, entity_id
            )));
        }
        Ok(())
    }
}
