//! Record store abstraction
//!
//! The platform persists its documents (scripts, import jobs, errors,
//! audit logs) through the [`RecordStore`] port. Production deployments
//! back it with the hosted document database; tests and the bundled
//! default use the in-memory implementation.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a record store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced record does not exist
    #[error("record not found: {0}")]
    NotFound(String),

    /// Backend-level failure (connectivity, corruption, quota)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A stored document together with its assigned id
#[derive(Debug, Clone)]
pub struct Record {
    /// Store-assigned identifier
    pub id: String,
    /// Document body
    pub data: Value,
}

/// Sort direction for [`Query::order_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A single filter condition against a document field
#[derive(Debug, Clone)]
pub enum Condition {
    /// Field equals the given value
    Eq(String, Value),
    /// Field is strictly less than the given value
    Lt(String, Value),
    /// Field is less than or equal to the given value
    Lte(String, Value),
    /// Field is greater than or equal to the given value
    Gte(String, Value),
    /// String field contains the given substring (case-insensitive)
    Contains(String, String),
    /// Field is absent or null
    Missing(String),
    /// At least one of the nested conditions holds
    AnyOf(Vec<Condition>),
}

impl Condition {
    /// Equality condition
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::Eq(field.into(), value)
    }

    /// Strictly-less-than condition
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::Lt(field.into(), value)
    }

    /// Less-than-or-equal condition
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self::Lte(field.into(), value)
    }

    /// Greater-than-or-equal condition
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::Gte(field.into(), value)
    }

    /// Case-insensitive substring condition
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains(field.into(), needle.into())
    }

    /// Absent-or-null condition
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// OR-group of conditions
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::AnyOf(conditions)
    }
}

/// A filtered, ordered, paginated query against one collection
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Conditions, all of which must hold
    pub conditions: Vec<Condition>,
    /// Optional ordering field and direction
    pub order_by: Option<(String, SortOrder)>,
    /// Number of matching records to skip
    pub skip: Option<usize>,
    /// Maximum number of records to return
    pub limit: Option<usize>,
}

impl Query {
    /// Query matching the given conditions, unordered and unpaginated
    pub fn filtered(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            ..Self::default()
        }
    }

    /// Set the ordering field and direction
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    /// Set the number of records to skip
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of records to return
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Document store port
///
/// Collections are named; documents are JSON objects. Updates are partial
/// merges at the top level, matching the semantics of the hosted document
/// database the platform deploys against.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a document, returning its assigned id
    async fn insert(&self, collection: &str, document: Value) -> Result<String, StoreError>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Merge the fields of `patch` into an existing document
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Delete a document by id, returning whether it existed
    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Find documents matching a query
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Count documents matching a query's conditions
    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StoreError>;

    /// Delete all documents matching a query's conditions, returning how
    /// many were removed
    async fn remove_where(&self, collection: &str, query: &Query) -> Result<u64, StoreError>;

    /// Atomically add `delta` to a numeric field of one document
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError>;
}
