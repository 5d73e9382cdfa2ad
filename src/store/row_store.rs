//! RowStore - abstract table access consumed by the trending aggregator.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Query, Row, StoreError, TableRef};

/// Asynchronous table service.
///
/// Each call is independently failable and independently awaited; nothing
/// here is transactional.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// List rows of a table matching `queries`.
    async fn list(&self, table: &TableRef, queries: &[Query]) -> Result<Vec<Row>, StoreError>;

    /// Create a row with a store-assigned id.
    async fn create(&self, table: &TableRef, data: Map<String, Value>) -> Result<Row, StoreError>;

    /// Merge `patch` into an existing row, returning the updated row.
    async fn update(
        &self,
        table: &TableRef,
        row_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Row, StoreError>;
}

#[async_trait]
impl<S: RowStore + ?Sized> RowStore for Arc<S> {
    async fn list(&self, table: &TableRef, queries: &[Query]) -> Result<Vec<Row>, StoreError> {
        (**self).list(table, queries).await
    }

    async fn create(&self, table: &TableRef, data: Map<String, Value>) -> Result<Row, StoreError> {
        (**self).create(table, data).await
    }

    async fn update(
        &self,
        table: &TableRef,
        row_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        (**self).update(table, row_id, patch).await
    }
}
