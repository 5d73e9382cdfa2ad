//! Catalog - the remote movie listing consumed by search and the home feed.
//!
//! The catalog is an external collaborator: this module only defines the
//! `Movie` shape, the [`Catalog`] trait and its error type. An
//! [`InMemoryCatalog`] is provided for tests and embedding.

#[cfg(feature = "in-memory")]
mod in_memory;
mod provider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A movie as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            release_date: None,
            vote_average: 0.0,
            overview: String::new(),
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }
}

/// Errors surfaced by a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request never produced a response (network, IO, timeout upstream).
    #[error("catalog transport error: {0}")]
    Transport(String),
    /// A response arrived but could not be understood.
    #[error("catalog data error: {0}")]
    Data(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Data(err.to_string())
    }
}

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryCatalog;
pub use provider::Catalog;
