//! What the search screen shows at each step.

use std::time::Duration;

use reeltrend::{SearchOptions, SearchView};

use crate::support::{advance, settle, Harness, DEBOUNCE};

#[tokio::test(start_paused = true)]
async fn prompt_before_anything_loads() {
    let h = Harness::new();
    assert_eq!(h.search.view(), SearchView::Prompt);

    h.search.edit("heat");
    assert_eq!(h.search.view(), SearchView::Prompt);
}

#[tokio::test(start_paused = true)]
async fn browse_shows_discovery_listing() {
    let h = Harness::with_options(SearchOptions {
        debounce: DEBOUNCE,
        auto_start: true,
    });
    assert_eq!(h.search.view(), SearchView::Loading);

    advance(Duration::from_millis(10)).await;
    match h.search.view() {
        SearchView::Browse(movies) => assert_eq!(movies.len(), 5),
        other => panic!("expected browse, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn results_and_no_results() {
    let h = Harness::new();

    h.search.edit("dune");
    settle().await;
    match h.search.view() {
        SearchView::Results { query, movies } => {
            assert_eq!(query, "dune");
            assert_eq!(movies.len(), 2);
        }
        other => panic!("expected results, got {:?}", other),
    }

    h.search.edit("zzz");
    settle().await;
    assert_eq!(
        h.search.view(),
        SearchView::NoResults {
            query: "zzz".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn loading_then_failed() {
    let h = Harness::new();
    h.catalog.fail(true);
    h.catalog.delay("heat", Duration::from_millis(200));

    h.search.edit("heat");
    settle().await;
    assert_eq!(h.search.view(), SearchView::Loading);

    advance(Duration::from_millis(200)).await;
    match h.search.view() {
        SearchView::Failed(error) => assert!(error.message.contains("catalog unreachable")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_returns_to_prompt() {
    let h = Harness::new();

    h.search.edit("heat");
    settle().await;
    h.search.edit("");
    settle().await;

    assert_eq!(h.search.view(), SearchView::Prompt);
}

#[tokio::test(start_paused = true)]
async fn revalidate_after_clearing_browses_discovery() {
    let h = Harness::new();

    h.search.edit("heat");
    settle().await;
    h.search.edit("");
    settle().await;

    let settlement = h.search.revalidate().await;
    assert!(settlement.authoritative);
    advance(Duration::from_millis(10)).await;

    assert_eq!(h.catalog.queries(), vec![Some("heat".to_string()), None]);
    match h.search.view() {
        SearchView::Browse(movies) => assert_eq!(movies.len(), 5),
        other => panic!("expected browse, got {:?}", other),
    }
    assert_eq!(h.count_for("heat").await, Some(1));
}
