//! InMemoryRowStore - insertion-ordered row store for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Query, Row, RowStore, StoreError, TableRef};

type Table = IndexMap<String, Map<String, Value>>;

/// In-memory row store.
///
/// Tables are created on first write; listing an unknown table yields no rows.
/// Iteration order is insertion order, which is what stable orderings fall back
/// on. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryRowStore {
    tables: Arc<RwLock<HashMap<TableRef, Table>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRowStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of rows currently held by `table`.
    pub fn row_count(&self, table: &TableRef) -> Result<usize, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(tables.get(table).map(IndexMap::len).unwrap_or(0))
    }

    fn unique_id(&self) -> String {
        format!("{:020x}", self.next_id.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn list(&self, table: &TableRef, queries: &[Query]) -> Result<Vec<Row>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let mut rows: Vec<Row> = match tables.get(table) {
            Some(rows) => rows
                .iter()
                .filter(|(_, data)| matches_filters(data, queries))
                .map(|(id, data)| Row {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect(),
            None => Vec::new(),
        };
        drop(tables);

        for query in queries {
            match query {
                Query::OrderDesc(field) => {
                    rows.sort_by(|a, b| compare_values(b.get(field), a.get(field)))
                }
                Query::OrderAsc(field) => {
                    rows.sort_by(|a, b| compare_values(a.get(field), b.get(field)))
                }
                _ => {}
            }
        }

        if let Some(limit) = queries.iter().find_map(|q| match q {
            Query::Limit(limit) => Some(*limit),
            _ => None,
        }) {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn create(&self, table: &TableRef, data: Map<String, Value>) -> Result<Row, StoreError> {
        let id = self.unique_id();
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        tables
            .entry(table.clone())
            .or_default()
            .insert(id.clone(), data.clone());

        Ok(Row { id, data })
    }

    async fn update(
        &self,
        table: &TableRef,
        row_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let data = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(row_id))
            .ok_or_else(|| StoreError::RowNotFound {
                table: table.to_string(),
                id: row_id.to_string(),
            })?;

        data.extend(patch);

        Ok(Row {
            id: row_id.to_string(),
            data: data.clone(),
        })
    }
}

fn matches_filters(data: &Map<String, Value>, queries: &[Query]) -> bool {
    queries.iter().all(|query| match query {
        Query::Equal { field, value } => data.get(field) == Some(value),
        _ => true,
    })
}

/// Numbers compare numerically and strings lexically; missing or mixed-type
/// fields sort as equal so the stable sort keeps store order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
