//! Row store - the shared table service trending counters live in.
//!
//! Rows are JSON objects addressed by a [`TableRef`] and a store-assigned id.
//! The store is consumed as an opaque service: list with filters, create and
//! patch. No transactions are offered, so read-then-write callers must accept
//! lost updates.
//!
//! ## Example
//!
//! ```ignore
//! use reeltrend::{InMemoryRowStore, Query, RowStore, TableRef};
//! use serde_json::json;
//!
//! let store = InMemoryRowStore::new();
//! let table = TableRef::new("catalog", "metrics");
//! let row = store.create(&table, json!({ "count": 1 }).as_object().unwrap().clone()).await?;
//! let rows = store.list(&table, &[Query::order_desc("count"), Query::limit(5)]).await?;
//! ```

#[cfg(feature = "in-memory")]
mod in_memory;
mod row_store;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Address of a table: the database/table pair supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub database_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(database_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            table_id: table_id.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database_id, self.table_id)
    }
}

/// A stored row: store-assigned id plus its JSON fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Row {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

/// A list filter, ordering or limit. Applied as filters first, then
/// orderings (stable, in the order given), then the limit.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { field: String, value: Value },
    OrderDesc(String),
    OrderAsc(String),
    Limit(usize),
}

impl Query {
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn order_desc(field: impl Into<String>) -> Self {
        Query::OrderDesc(field.into())
    }

    pub fn order_asc(field: impl Into<String>) -> Self {
        Query::OrderAsc(field.into())
    }

    pub fn limit(limit: usize) -> Self {
        Query::Limit(limit)
    }
}

/// Error type for row store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The row addressed by an update does not exist.
    #[error("row not found: {table}:{id}")]
    RowNotFound { table: String, id: String },
    /// Row payload could not be encoded or decoded.
    #[error("row serialization error: {0}")]
    Serde(String),
    /// The store could not be reached or failed internally.
    #[error("row storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryRowStore;
pub use row_store::RowStore;
