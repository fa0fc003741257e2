//! Document store abstraction
//!
//! Everything above this layer addresses data as `collection/id` documents
//! holding a JSON object. Writes are atomic per document and every write bumps
//! the document's `version`, which callers use for compare-and-swap updates.
//! Nothing is transactional across documents.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Store-level errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    #[error("document {collection}/{id} changed since it was read")]
    VersionConflict { collection: String, id: String },

    /// Network or backend failure; safe to retry reads, not blind writes.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(collection: &str, id: &str) -> Self {
        Self::AlreadyExists {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn version_conflict(collection: &str, id: &str) -> Self {
        Self::VersionConflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// Starts at 1 on creation, incremented by every write.
    pub version: u64,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Decode into a model. The document id is injected as the `id` field.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Decode into a model, keeping the version for a later conditional write.
    pub fn decode_versioned<T: DeserializeOwned>(&self) -> StoreResult<Versioned<T>> {
        Ok(Versioned {
            version: self.version,
            data: self.decode()?,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A decoded model together with the document version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub data: T,
}

/// Serialize a model into document fields, dropping its `id` (the id is the
/// document key, not a field).
pub fn encode<T: Serialize>(model: &T) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(model)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}

/// Filter predicate on a top-level field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Document id is one of the given ids
    IdIn(Vec<String>),
}

impl Predicate {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::Eq(field.to_string(), value.into())
    }

    pub fn gt(field: &str, value: impl Into<Value>) -> Self {
        Self::Gt(field.to_string(), value.into())
    }

    pub fn gte(field: &str, value: impl Into<Value>) -> Self {
        Self::Gte(field.to_string(), value.into())
    }

    pub fn lte(field: &str, value: impl Into<Value>) -> Self {
        Self::Lte(field.to_string(), value.into())
    }

    pub fn id_in<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IdIn(ids.into_iter().map(Into::into).collect())
    }

    /// Evaluate against a document. A missing field never matches.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::IdIn(ids) => ids.iter().any(|id| id == &doc.id),
            Self::Eq(field, expected) => doc
                .field(field)
                .is_some_and(|actual| compare_values(actual, expected) == Some(Ordering::Equal)),
            Self::Gt(field, bound) => doc
                .field(field)
                .is_some_and(|v| compare_values(v, bound) == Some(Ordering::Greater)),
            Self::Gte(field, bound) => doc.field(field).is_some_and(|v| {
                matches!(
                    compare_values(v, bound),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }),
            Self::Lte(field, bound) => doc.field(field).is_some_and(|v| {
                matches!(
                    compare_values(v, bound),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Filtered, ordered, limited collection query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply this query to an id-ordered sequence of documents. Backends that
    /// cannot push the query down use this directly.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut matched: Vec<Document> = docs
            .into_iter()
            .filter(|doc| self.predicates.iter().all(|p| p.matches(doc)))
            .filter(|doc| {
                self.order_by
                    .as_ref()
                    .is_none_or(|order| doc.field(&order.field).is_some())
            })
            .cloned()
            .collect();

        if let Some(order) = &self.order_by {
            // Stable sort: equal keys keep id order.
            matched.sort_by(|a, b| {
                let ord = match (a.field(&order.field), b.field(&order.field)) {
                    (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
    }
}

/// Compare two JSON values of the same kind. Values of different kinds are
/// incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Data-access boundary consumed by repositories
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Create or fully replace a document
    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>)
    -> StoreResult<Document>;

    /// Create a document; fails with `AlreadyExists` if the id is taken
    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document>;

    /// Merge fields into an existing document; fails with `NotFound`
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document>;

    /// Merge fields only if the document is still at `expected_version`;
    /// fails with `VersionConflict` otherwise
    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        fields: Map<String, Value>,
    ) -> StoreResult<Document>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Run a filtered, ordered, limited query
    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>>;

    /// Cheap round trip used by health checks
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(id: &str, fields: Value) -> Document {
        Document {
            id: id.to_string(),
            version: 1,
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_missing_field_never_matches() {
        let d = doc("a", json!({ "points": 3 }));
        assert!(Predicate::gte("points", 3).matches(&d));
        assert!(!Predicate::eq("isTechtronica", false).matches(&d));
        assert!(!Predicate::eq("points", "3").matches(&d));
    }

    #[test]
    fn test_query_orders_limits_and_keeps_id_order_for_ties() {
        let docs = vec![
            doc("a", json!({ "points": 2.0 })),
            doc("b", json!({ "points": 5 })),
            doc("c", json!({ "points": 2 })),
            doc("d", json!({})),
        ];

        let result = Query::new()
            .order_by("points", Direction::Descending)
            .limit(3)
            .apply(&docs);

        let ids: Vec<&str> = result.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_id_in_and_range() {
        let docs = vec![
            doc("p1", json!({ "date": "2025-03-01" })),
            doc("p2", json!({ "date": "2025-03-10" })),
            doc("p3", json!({ "date": "2025-03-20" })),
        ];

        let ranged = Query::new()
            .filter(Predicate::gte("date", "2025-03-05"))
            .filter(Predicate::lte("date", "2025-03-20"))
            .apply(&docs);
        assert_eq!(ranged.len(), 2);

        let by_id = Query::new()
            .filter(Predicate::id_in(["p1", "p3", "missing"]))
            .apply(&docs);
        assert_eq!(by_id.len(), 2);
    }

    #[test]
    fn test_encode_drops_id() {
        #[derive(Serialize)]
        struct Model {
            id: String,
            title: String,
        }

        let fields = encode(&Model {
            id: "x".to_string(),
            title: "Two Sum".to_string(),
        })
        .unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["title"], json!("Two Sum"));
    }
}
