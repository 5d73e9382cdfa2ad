//! InMemoryCatalog - fixed movie list for testing and development.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Catalog, CatalogError, Movie};

/// Catalog backed by an in-memory list.
///
/// Discovery returns the list in insertion order. Searches match titles
/// case-insensitively by substring. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            movies: Arc::new(RwLock::new(movies.into_iter().collect())),
        }
    }

    pub fn insert(&self, movie: Movie) -> Result<(), CatalogError> {
        self.movies
            .write()
            .map_err(|_| CatalogError::Transport("lock poisoned".into()))?
            .push(movie);
        Ok(())
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn query_movies(&self, query: Option<&str>) -> Result<Vec<Movie>, CatalogError> {
        let movies = self
            .movies
            .read()
            .map_err(|_| CatalogError::Transport("lock poisoned".into()))?;

        let needle = match query.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_lowercase(),
            _ => return Ok(movies.clone()),
        };

        Ok(movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
