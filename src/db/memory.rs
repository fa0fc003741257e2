//! In-memory document store
//!
//! Used for local development (`STORE_BACKEND=memory`) and tests. Each
//! collection is a `BTreeMap` so unordered queries and ties come back in id
//! order, the same stable order the Postgres backend uses.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::document::{Document, DocumentStore, Query, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn merge(doc: &mut Document, fields: Map<String, Value>) {
    for (key, value) in fields {
        doc.fields.insert(key, value);
    }
    doc.version += 1;
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let version = docs.get(id).map_or(1, |existing| existing.version + 1);
        let doc = Document {
            id: id.to_string(),
            version,
            fields,
        };
        docs.insert(id.to_string(), doc.clone());
        Ok(doc)
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(id) {
            return Err(StoreError::already_exists(collection, id));
        }

        let doc = Document {
            id: id.to_string(),
            version: 1,
            fields,
        };
        docs.insert(id.to_string(), doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        merge(doc, fields);
        Ok(doc.clone())
    }

    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        fields: Map<String, Value>,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        if doc.version != expected_version {
            return Err(StoreError::version_conflict(collection, id));
        }

        merge(doc, fields);
        Ok(doc.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| query.apply(docs.values()))
            .unwrap_or_default())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::document::{Direction, Predicate};

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_versions_advance_on_every_write() {
        let store = InMemoryStore::new();

        let created = store
            .create("leaderboard", "u1", fields(json!({ "points": 2 })))
            .await
            .unwrap();
        assert_eq!(created.version, 1);

        let updated = store
            .update("leaderboard", "u1", fields(json!({ "streak": 1 })))
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.fields["points"], json!(2));

        let replaced = store
            .set("leaderboard", "u1", fields(json!({ "points": 7 })))
            .await
            .unwrap();
        assert_eq!(replaced.version, 3);
        assert!(replaced.field("streak").is_none());
    }

    #[tokio::test]
    async fn test_conditional_update_rejects_stale_version() {
        let store = InMemoryStore::new();
        store
            .create("leaderboard", "u1", fields(json!({ "points": 2 })))
            .await
            .unwrap();

        store
            .update_if_version("leaderboard", "u1", 1, fields(json!({ "points": 4 })))
            .await
            .unwrap();

        let stale = store
            .update_if_version("leaderboard", "u1", 1, fields(json!({ "points": 9 })))
            .await;
        assert!(matches!(stale, Err(StoreError::VersionConflict { .. })));

        let current = store.get("leaderboard", "u1").await.unwrap().unwrap();
        assert_eq!(current.fields["points"], json!(4));
    }

    #[tokio::test]
    async fn test_create_and_update_errors() {
        let store = InMemoryStore::new();
        store.create("users", "u1", Map::new()).await.unwrap();

        assert!(matches!(
            store.create("users", "u1", Map::new()).await,
            Err(StoreError::AlreadyExists { .. })
        ));
        assert!(matches!(
            store.update("users", "nobody", Map::new()).await,
            Err(StoreError::NotFound { .. })
        ));

        store.delete("users", "u1").await.unwrap();
        store.delete("users", "u1").await.unwrap();
        assert_eq!(store.count("users").await, 0);
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = InMemoryStore::new();
        for (id, points, member) in [("u1", 4, true), ("u2", 9, false), ("u3", 6, true)] {
            store
                .set(
                    "leaderboard",
                    id,
                    fields(json!({ "points": points, "isTechtronica": member })),
                )
                .await
                .unwrap();
        }

        let members = store
            .query(
                "leaderboard",
                &Query::new()
                    .filter(Predicate::eq("isTechtronica", true))
                    .order_by("points", Direction::Descending),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = members.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u1"]);

        let missing = store.query("problems", &Query::new()).await.unwrap();
        assert!(missing.is_empty());
    }
}
