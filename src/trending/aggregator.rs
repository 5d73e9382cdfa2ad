//! TrendingAggregator - upsert-and-rank over a [`RowStore`].

use serde_json::{Map, Value};

use super::{
    SearchRecorded, TrendingError, TrendingRecord, DEFAULT_IMAGE_BASE_URL, DEFAULT_TRENDING_LIMIT,
};
use crate::catalog::Movie;
use crate::settings::Config;
use crate::store::{Query, RowStore, StoreError, TableRef};

const SEARCH_TERM: &str = "searchTerm";
const COUNT: &str = "count";

/// Records searches and reads the leaderboard.
///
/// The aggregator holds no records of its own: each call goes to the store.
/// `record_search` is a lookup followed by a conditional write with no
/// isolation, so two concurrent calls for the same term may both create a row
/// or both write the same incremented count.
#[derive(Clone)]
pub struct TrendingAggregator<S> {
    store: S,
    table: TableRef,
    image_base_url: String,
}

impl<S: RowStore> TrendingAggregator<S> {
    pub fn new(store: S, table: TableRef) -> Self {
        Self {
            store,
            table,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    /// Build an aggregator addressed by the configured table and image base.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.store.table_ref())
            .with_image_base_url(config.trending.image_base_url.clone())
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Count one search for `term`, whose top result was `top_movie`.
    ///
    /// Matches on the term alone: when a record exists, only its count
    /// changes, even if `top_movie` differs from the movie it was created with.
    pub async fn record_search(
        &self,
        term: &str,
        top_movie: &Movie,
    ) -> Result<SearchRecorded, TrendingError> {
        let recorded = self.upsert(term, top_movie).await?;
        tracing::info!(term, ?recorded, "recorded search");
        Ok(recorded)
    }

    async fn upsert(&self, term: &str, top_movie: &Movie) -> Result<SearchRecorded, TrendingError> {
        let existing = self
            .store
            .list(&self.table, &[Query::equal(SEARCH_TERM, term)])
            .await?;

        if let Some(row) = existing.first() {
            let count = row
                .get(COUNT)
                .and_then(Value::as_u64)
                .ok_or_else(|| TrendingError::MalformedRecord {
                    row_id: row.id.clone(),
                    reason: "missing numeric count".into(),
                })?;

            let count = count
                .checked_add(1)
                .ok_or_else(|| TrendingError::MalformedRecord {
                    row_id: row.id.clone(),
                    reason: "count overflow".into(),
                })?;

            let mut patch = Map::new();
            patch.insert(COUNT.into(), Value::from(count));
            let updated = self.store.update(&self.table, &row.id, patch).await?;

            return Ok(SearchRecorded::Incremented {
                row_id: updated.id,
                count,
            });
        }

        let record = TrendingRecord {
            search_term: term.to_string(),
            movie_id: top_movie.id,
            title: top_movie.title.clone(),
            poster_url: top_movie
                .poster_path
                .as_ref()
                .map(|path| format!("{}{}", self.image_base_url, path)),
            count: 1,
        };
        let data = match serde_json::to_value(&record).map_err(StoreError::from)? {
            Value::Object(data) => data,
            _ => Map::new(),
        };
        let created = self.store.create(&self.table, data).await?;

        Ok(SearchRecorded::Created { row_id: created.id })
    }

    /// The `limit` most-searched records, highest count first. Equal counts
    /// keep the store's iteration order.
    pub async fn get_trending(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingError> {
        let rows = self
            .store
            .list(
                &self.table,
                &[Query::order_desc(COUNT), Query::limit(limit)],
            )
            .await?;

        rows.iter().map(TrendingRecord::from_row).collect()
    }

    /// The leaderboard at its default size.
    pub async fn trending(&self) -> Result<Vec<TrendingRecord>, TrendingError> {
        self.get_trending(DEFAULT_TRENDING_LIMIT).await
    }
}
