use std::sync::Arc;

use async_trait::async_trait;

use super::{CatalogError, Movie};

/// Source of movie listings.
///
/// `None` asks for the default discovery listing; `Some(text)` runs a search.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn query_movies(&self, query: Option<&str>) -> Result<Vec<Movie>, CatalogError>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn query_movies(&self, query: Option<&str>) -> Result<Vec<Movie>, CatalogError> {
        (**self).query_movies(query).await
    }
}
