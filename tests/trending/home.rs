//! Home feed over a real aggregator.

use reeltrend::{
    Config, HomeFeed, HomeStatus, InMemoryCatalog, InMemoryRowStore, Movie, TrendingAggregator,
};

use crate::support::{search_n, table};

async fn ready(feed: &HomeFeed) -> HomeStatus {
    let mut trending = feed.trending().subscribe();
    let mut latest = feed.latest().subscribe();
    trending.wait_for(|s| !s.is_loading()).await.unwrap();
    latest.wait_for(|s| !s.is_loading()).await.unwrap();
    feed.status()
}

#[tokio::test]
async fn shows_configured_number_of_trending_searches() {
    let mut config = Config::default();
    config.trending.limit = 2;

    let store = InMemoryRowStore::new();
    let trending = TrendingAggregator::from_config(store, &config);
    search_n(&trending, "heat", 1, 3).await;
    search_n(&trending, "alien", 2, 1).await;
    search_n(&trending, "dune", 3, 2).await;

    let catalog = InMemoryCatalog::with_movies([Movie::new(1, "Heat"), Movie::new(2, "Alien")]);
    let feed = HomeFeed::from_config(catalog, trending, &config);

    match ready(&feed).await {
        HomeStatus::Ready { trending, latest } => {
            let terms: Vec<&str> = trending.iter().map(|r| r.search_term.as_str()).collect();
            assert_eq!(terms, vec!["heat", "dune"]);
            assert_eq!(latest.len(), 2);
        }
        other => panic!("expected ready, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_store_and_catalog_are_ready() {
    let trending = TrendingAggregator::new(InMemoryRowStore::new(), table());
    let feed = HomeFeed::load(InMemoryCatalog::new(), trending, 5);

    assert_eq!(
        ready(&feed).await,
        HomeStatus::Ready {
            trending: vec![],
            latest: vec![]
        }
    );
}
