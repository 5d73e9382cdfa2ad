//! Counting and ranking.

use reeltrend::{
    InMemoryRowStore, Query, RowStore, SearchRecorded, TrendingAggregator, TrendingError,
    DEFAULT_TRENDING_LIMIT,
};
use serde_json::{json, Map, Value};

use crate::support::{aggregator, movie, search_n, table};

#[tokio::test]
async fn first_search_creates_then_increments() {
    let trending = aggregator();

    let first = trending.record_search("alien", &movie(1)).await.unwrap();
    let second = trending.record_search("alien", &movie(1)).await.unwrap();

    let row_id = match first {
        SearchRecorded::Created { row_id } => row_id,
        other => panic!("expected a new record, got {:?}", other),
    };
    assert_eq!(second, SearchRecorded::Incremented { row_id, count: 2 });
}

#[tokio::test]
async fn one_record_per_term_keeps_first_movie() {
    let trending = aggregator();

    trending.record_search("star", &movie(1)).await.unwrap();
    trending.record_search("star", &movie(2)).await.unwrap();
    trending.record_search("star", &movie(3)).await.unwrap();

    let records = trending.trending().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].movie_id, 1);
    assert_eq!(records[0].title, "Movie 1");
    assert_eq!(
        records[0].poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/poster-1.jpg")
    );
    assert_eq!(records[0].count, 3);
}

#[tokio::test]
async fn ranks_by_count_descending() {
    let trending = aggregator();
    for (term, times) in [("a", 7), ("b", 3), ("c", 9), ("d", 1), ("e", 5)] {
        search_n(&trending, term, times as u64, times).await;
    }

    let top: Vec<u64> = trending
        .get_trending(3)
        .await
        .unwrap()
        .iter()
        .map(|r| r.count)
        .collect();
    assert_eq!(top, vec![9, 7, 5]);

    let all = trending.get_trending(10).await.unwrap();
    let terms: Vec<&str> = all.iter().map(|r| r.search_term.as_str()).collect();
    assert_eq!(terms, vec!["c", "a", "e", "b", "d"]);
}

#[tokio::test]
async fn default_limit_is_five() {
    let trending = aggregator();
    for (i, term) in ["a", "b", "c", "d", "e", "f", "g"].into_iter().enumerate() {
        search_n(&trending, term, i as u64, i + 1).await;
    }

    let records = trending.trending().await.unwrap();
    assert_eq!(records.len(), DEFAULT_TRENDING_LIMIT);
    assert_eq!(records[0].search_term, "g");
    assert_eq!(records[4].search_term, "c");
}

#[tokio::test]
async fn empty_leaderboard() {
    assert!(aggregator().trending().await.unwrap().is_empty());
}

#[tokio::test]
async fn rows_use_table_field_names() {
    let store = InMemoryRowStore::new();
    let trending = TrendingAggregator::new(store.clone(), table());
    trending.record_search("heat", &movie(3)).await.unwrap();

    let rows = store
        .list(&table(), &[Query::equal("searchTerm", "heat")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("count"), Some(&json!(1)));
    assert_eq!(rows[0].get("movie_id"), Some(&json!(3)));
}

#[tokio::test]
async fn malformed_row_surfaces_as_error() {
    let store = InMemoryRowStore::new();
    let mut data = Map::new();
    data.insert("searchTerm".into(), Value::from("broken"));
    data.insert("count".into(), Value::from("many"));
    store.create(&table(), data).await.unwrap();

    let trending = TrendingAggregator::new(store, table());
    let err = trending.trending().await.unwrap_err();
    assert!(matches!(err, TrendingError::MalformedRecord { .. }));
}
