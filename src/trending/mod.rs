//! Trending - search-count leaderboard kept in the shared row store.
//!
//! Every settled search with at least one result bumps a counter keyed by the
//! search term. The first search for a term captures the top movie's display
//! metadata; later searches only increment the count.

mod aggregator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{Row, StoreError};

pub use aggregator::TrendingAggregator;

/// Size of the leaderboard when no limit is given.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Prefix joined with a movie's poster path to form its poster URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// One leaderboard row, with the field names used by the backing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingRecord {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    pub count: u64,
}

impl TrendingRecord {
    pub(crate) fn from_row(row: &Row) -> Result<Self, TrendingError> {
        serde_json::from_value(serde_json::Value::Object(row.data.clone())).map_err(|e| {
            TrendingError::MalformedRecord {
                row_id: row.id.clone(),
                reason: e.to_string(),
            }
        })
    }
}

/// What a `record_search` call wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRecorded {
    /// No record matched the term; a new one was created with a count of 1.
    Created { row_id: String },
    /// The first matching record had its count bumped to `count`.
    Incremented { row_id: String, count: u64 },
}

/// Errors from recording or reading trending searches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrendingError {
    /// A lookup, create or update against the row store failed.
    #[error("trending store error: {0}")]
    Store(#[from] StoreError),
    /// A stored row does not have the shape of a trending record.
    #[error("malformed trending record {row_id}: {reason}")]
    MalformedRecord { row_id: String, reason: String },
}
