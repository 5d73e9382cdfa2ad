//! Input debouncing and supersession of in-flight searches.

use std::time::Duration;

use reeltrend::{ResourceState, SearchPhase};

use crate::support::{advance, settle, Harness, DEBOUNCE};

#[tokio::test(start_paused = true)]
async fn rapid_edits_issue_one_query() {
    let h = Harness::new();

    h.search.edit("a");
    advance(Duration::from_millis(100)).await;
    h.search.edit("ab");
    advance(Duration::from_millis(100)).await;
    h.search.edit("abc");
    assert_eq!(h.search.phase(), SearchPhase::Debouncing);
    assert!(h.catalog.queries().is_empty());

    settle().await;

    assert_eq!(h.catalog.queries(), vec![Some("abc".to_string())]);
    assert_eq!(h.search.phase(), SearchPhase::Settled);
    assert_eq!(h.search.settled_text().as_deref(), Some("abc"));
}

#[tokio::test(start_paused = true)]
async fn nothing_happens_before_the_quiet_period() {
    let h = Harness::new();

    h.search.edit("heat");
    advance(DEBOUNCE - Duration::from_millis(1)).await;
    assert!(h.catalog.queries().is_empty());
    assert!(h.search.is_debouncing());

    advance(Duration::from_millis(2)).await;
    assert_eq!(h.catalog.queries(), vec![Some("heat".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn blank_query_clears_without_fetching() {
    let h = Harness::new();

    h.search.edit("heat");
    settle().await;
    assert!(matches!(h.search.state(), ResourceState::Success(_)));

    h.search.edit("   ");
    settle().await;

    assert_eq!(h.catalog.queries().len(), 1);
    assert!(h.search.state().is_idle());
    assert_eq!(h.search.phase(), SearchPhase::Empty);
    assert_eq!(h.search.settled_text(), None);
    assert_eq!(h.count_for("   ").await, None);
}

#[tokio::test(start_paused = true)]
async fn newer_query_supersedes_slow_fetch() {
    let h = Harness::new();
    h.catalog.delay("dune", Duration::from_millis(1_000));

    h.search.edit("dune");
    settle().await;
    assert_eq!(h.search.phase(), SearchPhase::Fetching);
    assert!(h.search.state().is_loading());

    h.search.edit("dune 2");
    settle().await;
    let results = h.search.state();
    assert_eq!(results.data().map(|m| m[0].title.as_str()), Some("Dune 2"));

    // Let the stale "dune" response arrive.
    advance(Duration::from_millis(2_000)).await;

    assert_eq!(
        h.catalog.queries(),
        vec![Some("dune".to_string()), Some("dune 2".to_string())]
    );
    assert_eq!(h.search.state(), results);
    assert_eq!(h.count_for("dune 2").await, Some(1));
    assert_eq!(h.count_for("dune").await, None);
}

#[tokio::test(start_paused = true)]
async fn edit_during_fetch_restarts_debounce() {
    let h = Harness::new();
    h.catalog.delay("heat", Duration::from_millis(300));

    h.search.edit("heat");
    settle().await;
    h.search.edit("heat ");
    assert_eq!(h.search.phase(), SearchPhase::Debouncing);

    // The first fetch lands while the second edit is still debouncing.
    advance(Duration::from_millis(300)).await;
    assert_eq!(h.search.phase(), SearchPhase::Debouncing);
    assert_eq!(h.count_for("heat").await, Some(1));

    settle().await;
    assert_eq!(h.search.phase(), SearchPhase::Settled);
    assert_eq!(h.count_for("heat ").await, Some(1));
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_timer() {
    let h = Harness::new();

    h.search.edit("heat");
    h.search.teardown();
    advance(Duration::from_millis(2_000)).await;

    assert!(h.catalog.queries().is_empty());
    assert!(!h.search.is_debouncing());

    h.search.edit("dune");
    advance(Duration::from_millis(2_000)).await;
    assert!(h.catalog.queries().is_empty());
    assert_eq!(h.search.text(), "heat");
}

#[tokio::test(start_paused = true)]
async fn teardown_during_fetch_drops_the_result() {
    let h = Harness::new();
    h.catalog.delay("heat", Duration::from_millis(1_000));

    h.search.edit("heat");
    settle().await;
    h.search.teardown();
    advance(Duration::from_millis(2_000)).await;

    assert!(h.search.state().is_loading());
    assert!(h.records().await.is_empty());
}
