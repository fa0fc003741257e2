//! PostgreSQL document store
//!
//! All collections share one `documents` table; fields live in a JSONB
//! column and `version` backs the conditional writes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};

use super::document::{Direction, Document, DocumentStore, Predicate, Query, StoreError, StoreResult};

/// Repository-facing store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    version: i64,
    fields: Json<Map<String, Value>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            version: row.version as u64,
            fields: row.fields.0,
        }
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the SELECT for a collection query. Field paths are inlined as
    /// literals so they match the expression indexes in the migrations.
    fn select(collection: &str, query: &Query) -> StoreResult<QueryBuilder<'static, Postgres>> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT id, version, fields FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());

        for predicate in &query.predicates {
            match predicate {
                Predicate::IdIn(ids) => {
                    builder.push(" AND id = ANY(");
                    builder.push_bind(ids.clone());
                    builder.push(")");
                }
                Predicate::Eq(field, value) => push_comparison(&mut builder, field, "=", value)?,
                Predicate::Gt(field, value) => push_comparison(&mut builder, field, ">", value)?,
                Predicate::Gte(field, value) => push_comparison(&mut builder, field, ">=", value)?,
                Predicate::Lte(field, value) => push_comparison(&mut builder, field, "<=", value)?,
            }
        }

        match &query.order_by {
            Some(order) => {
                let path = field_path(&order.field)?;
                builder.push(format!(" AND {path} IS NOT NULL ORDER BY {path}"));
                builder.push(match order.direction {
                    Direction::Ascending => " ASC, id ASC",
                    Direction::Descending => " DESC, id ASC",
                });
            }
            None => {
                builder.push(" ORDER BY id ASC");
            }
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }

        Ok(builder)
    }
}

/// `fields -> 'name'` for a top-level document field
fn field_path(field: &str) -> StoreResult<String> {
    let valid = field.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidQuery(format!("unsupported field name {field:?}")));
    }
    Ok(format!("(fields -> '{field}')"))
}

fn push_comparison(
    builder: &mut QueryBuilder<'static, Postgres>,
    field: &str,
    operator: &str,
    value: &Value,
) -> StoreResult<()> {
    let path = field_path(field)?;
    // Values of different JSON kinds never match, like the in-memory store.
    builder.push(format!(" AND jsonb_typeof({path}) = jsonb_typeof("));
    builder.push_bind(Json(value.clone()));
    builder.push(format!(") AND {path} {operator} "));
    builder.push_bind(Json(value.clone()));
    Ok(())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"SELECT id, version, fields FROM documents WHERE collection = $1 AND id = $2"#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(Document::from))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, id, version, fields, updated_at)
            VALUES ($1, $2, 1, $3, NOW())
            ON CONFLICT (collection, id) DO UPDATE
            SET fields = EXCLUDED.fields,
                version = documents.version + 1,
                updated_at = NOW()
            RETURNING id, version, fields
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.into())
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, id, version, fields, updated_at)
            VALUES ($1, $2, 1, $3, NOW())
            ON CONFLICT (collection, id) DO NOTHING
            RETURNING id, version, fields
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(Document::from)
            .ok_or_else(|| StoreError::already_exists(collection, id))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET fields = fields || $3, version = version + 1, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, version, fields
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(Document::from)
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET fields = fields || $3, version = version + 1, updated_at = NOW()
            WHERE collection = $1 AND id = $2 AND version = $4
            RETURNING id, version, fields
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .bind(expected_version as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(row) => Ok(row.into()),
            None if self.get(collection, id).await?.is_some() => {
                Err(StoreError::version_conflict(collection, id))
            }
            None => Err(StoreError::not_found(collection, id)),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        sqlx::query(r#"DELETE FROM documents WHERE collection = $1 AND id = $2"#)
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let rows = Self::select(collection, query)?
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        super::test_connection(&self.pool).await.map_err(unavailable)
    }
}
