//! Home feed - the landing surface: trending leaderboard plus latest movies.
//!
//! Both lists are independent [`AsyncResource`]s started on load, so one can
//! fail while the other still shows data.

use std::sync::Arc;

use crate::catalog::{Catalog, Movie};
use crate::error::ErrorInfo;
use crate::resource::{AsyncResource, Invocation, ResourceState};
use crate::settings::Config;
use crate::store::RowStore;
use crate::trending::{TrendingAggregator, TrendingRecord};

/// Combined status of the two home lists.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeStatus {
    Loading,
    Failed(ErrorInfo),
    Ready {
        trending: Vec<TrendingRecord>,
        latest: Vec<Movie>,
    },
}

pub struct HomeFeed {
    trending: AsyncResource<Vec<TrendingRecord>>,
    latest: AsyncResource<Vec<Movie>>,
}

impl HomeFeed {
    /// Bind and start both lists. Must be called inside a Tokio runtime.
    pub fn load<C, S>(catalog: C, aggregator: TrendingAggregator<S>, limit: usize) -> Self
    where
        C: Catalog + 'static,
        S: RowStore + 'static,
    {
        let aggregator = Arc::new(aggregator);
        let trending = AsyncResource::bind(
            move || {
                let aggregator = Arc::clone(&aggregator);
                async move { aggregator.get_trending(limit).await }
            },
            true,
        );

        let catalog = Arc::new(catalog);
        let latest = AsyncResource::bind(
            move || {
                let catalog = Arc::clone(&catalog);
                async move { catalog.query_movies(None).await }
            },
            true,
        );

        Self { trending, latest }
    }

    /// [`load`](Self::load) with the configured leaderboard size.
    pub fn from_config<C, S>(catalog: C, aggregator: TrendingAggregator<S>, config: &Config) -> Self
    where
        C: Catalog + 'static,
        S: RowStore + 'static,
    {
        Self::load(catalog, aggregator, config.trending.limit)
    }

    pub fn trending(&self) -> &AsyncResource<Vec<TrendingRecord>> {
        &self.trending
    }

    pub fn latest(&self) -> &AsyncResource<Vec<Movie>> {
        &self.latest
    }

    /// Reload both lists.
    pub fn refresh(&self) -> (Invocation<Vec<TrendingRecord>>, Invocation<Vec<Movie>>) {
        (self.trending.refetch(), self.latest.refetch())
    }

    /// Loading while either list loads; otherwise the first failure (latest
    /// movies before trending); otherwise both lists.
    pub fn status(&self) -> HomeStatus {
        let trending = self.trending.state();
        let latest = self.latest.state();

        if trending.is_loading() || latest.is_loading() {
            return HomeStatus::Loading;
        }
        if let Some(error) = latest.error().or_else(|| trending.error()) {
            return HomeStatus::Failed(error.clone());
        }
        match (trending, latest) {
            (ResourceState::Success(trending), ResourceState::Success(latest)) => {
                HomeStatus::Ready { trending, latest }
            }
            _ => HomeStatus::Loading,
        }
    }

    pub fn teardown(&self) {
        self.trending.teardown();
        self.latest.teardown();
    }
}

impl Drop for HomeFeed {
    fn drop(&mut self) {
        self.teardown();
    }
}
