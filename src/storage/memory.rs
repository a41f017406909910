//! In-memory record store
//!
//! Reference implementation of [`RecordStore`] used by tests and the
//! bundled `memory` backend. Documents live in a map of collections
//! guarded by a single async RwLock.

use super::{Condition, Query, Record, RecordStore, SortOrder, StoreError};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type Collections = HashMap<String, HashMap<String, Value>>;

/// In-memory [`RecordStore`] backend
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<String, StoreError> {
        if !document.is_object() {
            return Err(StoreError::Backend(
                "documents must be JSON objects".to_string(),
            ));
        }
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::Backend(
                "update patch must be a JSON object".to_string(),
            ));
        };
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;
        if let Value::Object(fields) = doc {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let collections = self.collections.read().await;
        let mut matches: Vec<Record> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| query.conditions.iter().all(|c| matches_condition(doc, c)))
                    .map(|(id, doc)| Record {
                        id: id.clone(),
                        data: doc.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, order)) = &query.order_by {
            matches.sort_by(|a, b| {
                let ordering = compare_fields(&a.data, &b.data, field);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let skip = query.skip.unwrap_or(0);
        let mut matches: Vec<Record> = matches.into_iter().skip(skip).collect();
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| query.conditions.iter().all(|c| matches_condition(doc, c)))
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn remove_where(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let doomed: Vec<String> = docs
            .iter()
            .filter(|(_, doc)| query.conditions.iter().all(|c| matches_condition(doc, c)))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            docs.remove(id);
        }
        Ok(doomed.len() as u64)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;
        if let Value::Object(fields) = doc {
            let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
            fields.insert(field.to_string(), Value::from(current + delta));
        }
        Ok(())
    }
}

fn field_of<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    doc.get(field).filter(|v| !v.is_null())
}

fn matches_condition(doc: &Value, condition: &Condition) -> bool {
    match condition {
        Condition::Eq(field, value) => field_of(doc, field) == Some(value),
        Condition::Lt(field, value) => {
            field_of(doc, field).is_some_and(|v| compare_values(v, value) == Ordering::Less)
        }
        Condition::Lte(field, value) => {
            field_of(doc, field).is_some_and(|v| compare_values(v, value) != Ordering::Greater)
        }
        Condition::Gte(field, value) => {
            field_of(doc, field).is_some_and(|v| compare_values(v, value) != Ordering::Less)
        }
        Condition::Contains(field, needle) => field_of(doc, field)
            .and_then(Value::as_str)
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
        Condition::Missing(field) => field_of(doc, field).is_none(),
        Condition::AnyOf(conditions) => conditions.iter().any(|c| matches_condition(doc, c)),
    }
}

fn compare_fields(a: &Value, b: &Value, field: &str) -> Ordering {
    match (field_of(a, field), field_of(b, field)) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ordering over JSON scalars: numbers numerically, strings as RFC 3339
/// timestamps when both sides parse, lexicographically otherwise.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
        if let (Ok(a), Ok(b)) = (
            DateTime::parse_from_rfc3339(a),
            DateTime::parse_from_rfc3339(b),
        ) {
            return a.cmp(&b);
        }
        return a.cmp(b);
    }
    Ordering::Equal
}
