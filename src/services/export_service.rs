use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AttributeService, EntityService, ModelService, ReferentialService};
use crate::database::models::{Attribute, DataModel, Entity, Referential};
use crate::database::DatabaseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Sql,
}

/// A data model with everything beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct ModelExport {
    pub model: DataModel,
    pub entities: Vec<EntityExport>,
    pub referentials: Vec<Referential>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityExport {
    #[serde(flatten)]
    pub entity: Entity,
    pub attributes: Vec<Attribute>,
}

pub struct ExportService {
    pool: PgPool,
}

impl ExportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load(&self, model_id: Uuid) -> Result<ModelExport, DatabaseError> {
        let model = ModelService::new(self.pool.clone()).get(model_id).await?;
        let entities = EntityService::new(self.pool.clone()).list_by_model(model_id).await?;

        let attribute_service = AttributeService::new(self.pool.clone());
        let attributes = try_join_all(
            entities.iter().map(|entity| attribute_service.list_by_entity(entity.id)),
        )
        .await?;

        let entities = entities
            .into_iter()
            .zip(attributes)
            .map(|(entity, attributes)| EntityExport { entity, attributes })
            .collect();

        let referentials = ReferentialService::new(self.pool.clone()).list_by_model(model_id).await?;

        Ok(ModelExport { model, entities, referentials })
    }
}

impl ModelExport {
    /// One `CREATE TABLE` per entity.
    pub fn to_sql(&self) -> String {
        let mut ddl = format!("-- Data model: {}\n", single_line(&self.model.name));

        for export in &self.entities {
            ddl += &format!("\nCREATE TABLE {} (", quote_identifier(&export.entity.name));

            let mut lines: Vec<String> = export
                .attributes
                .iter()
                .map(|attr| {
                    let nullable = if attr.is_nullable && !attr.is_primary_key { "" } else { " NOT NULL" };
                    format!("{} {}{}", quote_identifier(&attr.name), sql_type(&attr.data_type), nullable)
                })
                .collect();

            let keys: Vec<String> = export
                .attributes
                .iter()
                .filter(|attr| attr.is_primary_key)
                .map(|attr| quote_identifier(&attr.name))
                .collect();
            if !keys.is_empty() {
                lines.push(format!("PRIMARY KEY ({})", keys.join(", ")));
            }

            for (i, line) in lines.iter().enumerate() {
                let separator = if i + 1 < lines.len() { "," } else { "" };
                ddl += &format!("\n    {}{}", line, separator);
            }
            ddl += "\n);\n";
        }

        for referential in &self.referentials {
            ddl += &self.foreign_key(referential);
        }

        ddl
    }

    /// `ALTER TABLE ... FOREIGN KEY` when both sides name a column, a
    /// comment otherwise.
    fn foreign_key(&self, referential: &Referential) -> String {
        let source = self.column(referential.source_entity_id, referential.source_attribute_id);
        let target = self.column(referential.target_entity_id, referential.target_attribute_id);

        match (source, target) {
            (Some((source_table, Some(source_column))), Some((target_table, Some(target_column)))) => format!(
                "\nALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {};\n",
                quote_identifier(source_table),
                quote_identifier(&referential.name),
                quote_identifier(source_column),
                quote_identifier(target_table),
                quote_identifier(target_column),
                on_delete_action(&referential.on_delete),
            ),
            (source, target) => format!(
                "\n-- {} ({}): {} -> {}, no column mapping\n",
                single_line(&referential.name),
                single_line(&referential.cardinality),
                single_line(source.map_or("?", |(table, _)| table)),
                single_line(target.map_or("?", |(table, _)| table)),
            ),
        }
    }

    /// Entity name and, when given and present, attribute name.
    fn column(&self, entity_id: Uuid, attribute_id: Option<Uuid>) -> Option<(&str, Option<&str>)> {
        let export = self.entities.iter().find(|e| e.entity.id == entity_id)?;
        let column = attribute_id
            .and_then(|id| export.attributes.iter().find(|attr| attr.id == id))
            .map(|attr| attr.name.as_str());
        Some((export.entity.name.as_str(), column))
    }
}

fn on_delete_action(stored: &str) -> &'static str {
    match stored {
        "cascade" => "CASCADE",
        "restrict" => "RESTRICT",
        "set null" => "SET NULL",
        _ => "NO ACTION",
    }
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Map an attribute's declared type onto a Postgres column type.
fn sql_type(declared: &str) -> String {
    let normalized = declared.trim().to_ascii_uppercase();

    let alias = match normalized.as_str() {
        "STRING" => Some("TEXT"),
        "INT" | "INTEGER" => Some("INTEGER"),
        "NUMBER" => Some("NUMERIC"),
        "BOOL" | "BOOLEAN" => Some("BOOLEAN"),
        "DATETIME" | "DATE-TIME" => Some("TIMESTAMPTZ"),
        "OBJECT" | "ARRAY" => Some("JSONB"),
        _ => None,
    };
    if let Some(alias) = alias {
        return alias.to_string();
    }

    const KNOWN: [&str; 20] = [
        "TEXT", "VARCHAR", "CHAR", "BIGINT", "SMALLINT", "SERIAL", "BIGSERIAL", "NUMERIC",
        "DECIMAL", "REAL", "DOUBLE PRECISION", "FLOAT", "DATE", "TIME", "TIMESTAMP",
        "TIMESTAMPTZ", "UUID", "JSON", "JSONB", "BYTEA",
    ];

    let (base, args) = match normalized.find('(') {
        Some(open) => (normalized[..open].trim_end(), Some(&normalized[open..])),
        None => (normalized.as_str(), None),
    };

    let args_ok = args.map_or(true, |args| {
        args.len() > 2
            && args.ends_with(')')
            && args[1..args.len() - 1]
                .split(',')
                .all(|n| !n.trim().is_empty() && n.trim().chars().all(|c| c.is_ascii_digit()))
    });

    if KNOWN.contains(&base) && args_ok {
        normalized
    } else {
        "TEXT".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn attribute(name: &str, data_type: &str, is_nullable: bool, is_primary_key: bool) -> Attribute {
        Attribute {
            id: Uuid::new_v4(),
            entity_id: Uuid::nil(),
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable,
            is_primary_key,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn export(entity_name: &str, attributes: Vec<Attribute>) -> ModelExport {
        let now = Utc::now();
        ModelExport {
            model: DataModel {
                id: Uuid::new_v4(),
                project_id: Uuid::new_v4(),
                name: "Billing".to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            },
            entities: vec![EntityExport {
                entity: Entity {
                    id: Uuid::nil(),
                    data_model_id: Uuid::new_v4(),
                    name: entity_name.to_string(),
                    description: None,
                    created_at: now,
                    updated_at: now,
                },
                attributes,
            }],
            referentials: Vec::new(),
        }
    }

    fn referential(name: &str, source: (Uuid, Option<Uuid>), target: (Uuid, Option<Uuid>), on_delete: &str) -> Referential {
        Referential {
            id: Uuid::new_v4(),
            data_model_id: Uuid::new_v4(),
            name: name.to_string(),
            source_entity_id: source.0,
            source_attribute_id: source.1,
            target_entity_id: target.0,
            target_attribute_id: target.1,
            cardinality: "one_to_many".to_string(),
            on_delete: on_delete.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_create_table() {
        let sql = export(
            "invoice",
            vec![
                attribute("id", "uuid", false, true),
                attribute("total", "numeric(10,2)", false, false),
                attribute("memo", "string", true, false),
            ],
        )
        .to_sql();

        assert_eq!(
            sql,
            "-- Data model: Billing\n\
             \nCREATE TABLE \"invoice\" (\
             \n    \"id\" UUID NOT NULL,\
             \n    \"total\" NUMERIC(10,2) NOT NULL,\
             \n    \"memo\" TEXT,\
             \n    PRIMARY KEY (\"id\")\
             \n);\n"
        );
    }

    #[test]
    fn quotes_hostile_identifiers() {
        let sql = export("a\"; DROP TABLE x; --", vec![attribute("b\"c", "text", true, false)]).to_sql();
        assert!(sql.contains("CREATE TABLE \"a\"\"; DROP TABLE x; --\" ("));
        assert!(sql.contains("\"b\"\"c\" TEXT"));
    }

    #[test]
    fn maps_declared_types() {
        assert_eq!(sql_type("varchar(255)"), "VARCHAR(255)");
        assert_eq!(sql_type("integer"), "INTEGER");
        assert_eq!(sql_type("date-time"), "TIMESTAMPTZ");
        assert_eq!(sql_type("object"), "JSONB");
        assert_eq!(sql_type("double precision"), "DOUBLE PRECISION");
        assert_eq!(sql_type("money; DROP"), "TEXT");
        assert_eq!(sql_type("varchar(x)"), "TEXT");
        assert_eq!(sql_type("varchar()"), "TEXT");
    }

    #[test]
    fn json_export_nests_attributes_under_entities() {
        let value = serde_json::to_value(export("invoice", vec![attribute("id", "uuid", false, true)])).unwrap();
        assert_eq!(value["model"]["name"], "Billing");
        assert_eq!(value["entities"][0]["name"], "invoice");
        assert_eq!(value["entities"][0]["attributes"][0]["name"], "id");
    }

    #[test]
    fn export_format_defaults_to_json() {
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
        let format: ExportFormat = serde_json::from_str("\"sql\"").unwrap();
        assert_eq!(format, ExportFormat::Sql);
    }

    #[test]
    fn renders_foreign_keys_for_mapped_referentials() {
        let customer_id = attribute("id", "uuid", false, true);
        let invoice_customer = attribute("customer_id", "uuid", false, false);
        let (customer_pk, invoice_fk) = (customer_id.id, invoice_customer.id);

        let mut model = export("invoice", vec![attribute("id", "uuid", false, true), invoice_customer]);
        let customer = Uuid::new_v4();
        let mut customer_entity = model.entities[0].clone();
        customer_entity.entity.id = customer;
        customer_entity.entity.name = "customer".to_string();
        customer_entity.attributes = vec![customer_id];
        model.entities.push(customer_entity);

        let invoice = Uuid::nil();
        model.referentials = vec![
            referential("invoice_customer_fk", (invoice, Some(invoice_fk)), (customer, Some(customer_pk)), "cascade"),
            referential("billed\nto", (invoice, None), (customer, None), "no action"),
            referential("odd", (invoice, Some(invoice_fk)), (customer, Some(customer_pk)), "drop table"),
        ];

        let sql = model.to_sql();
        assert!(sql.contains(
            "\nALTER TABLE \"invoice\" ADD CONSTRAINT \"invoice_customer_fk\" \
             FOREIGN KEY (\"customer_id\") REFERENCES \"customer\" (\"id\") ON DELETE CASCADE;\n"
        ));
        assert!(sql.contains("\n-- billed to (one_to_many): invoice -> customer, no column mapping\n"));
        assert!(sql.contains("ADD CONSTRAINT \"odd\" FOREIGN KEY (\"customer_id\") REFERENCES \"customer\" (\"id\") ON DELETE NO ACTION;"));

        // tables come before the constraints that reference them
        let table = sql.find("CREATE TABLE \"customer\"").unwrap();
        let constraint = sql.find("ALTER TABLE").unwrap();
        assert!(table < constraint);

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["referentials"][0]["name"], "invoice_customer_fk");
        assert_eq!(value["referentials"][0]["on_delete"], "cascade");
    }
}
