//! Concurrent recording of the same term.
//!
//! The upsert is a lookup followed by a write with nothing in between to
//! serialize it, so two concurrent searches for a new term may create two
//! records. No search may be lost either way.

use reeltrend::TrendingAggregator;

use crate::support::{movie, table, YieldingStore};

#[tokio::test]
async fn concurrent_first_searches_are_both_counted() {
    let trending = TrendingAggregator::new(YieldingStore::default(), table());

    let (m1, m2) = (movie(1), movie(1));
    let (a, b) = tokio::join!(
        trending.record_search("joker", &m1),
        trending.record_search("joker", &m2),
    );
    a.unwrap();
    b.unwrap();

    let records = trending.get_trending(10).await.unwrap();
    let total: u64 = records
        .iter()
        .filter(|r| r.search_term == "joker")
        .map(|r| r.count)
        .sum();
    assert_eq!(total, 2);
    assert!(records.len() == 1 || records.len() == 2);
}

#[tokio::test]
async fn sequential_searches_never_duplicate() {
    let trending = TrendingAggregator::new(YieldingStore::default(), table());

    for _ in 0..4 {
        trending.record_search("joker", &movie(1)).await.unwrap();
    }

    let records = trending.get_trending(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].count, 4);
}
