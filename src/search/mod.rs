//! Search - debounced catalog queries that feed the trending leaderboard.
//!
//! A [`SearchController`] takes raw input edits, waits for a quiet period,
//! then queries the catalog through an [`AsyncResource`](crate::AsyncResource)
//! and counts the settled term against its top result.
//!
//! ```text
//! Empty ──edit──▶ Debouncing ──quiet, blank──▶ Empty
//!                     │
//!                     └──quiet, text──▶ Fetching ──settles──▶ Settled
//! Settled / Fetching ──edit──▶ Debouncing
//! ```

mod controller;
mod debounce;

use std::time::Duration;

use crate::catalog::Movie;
use crate::error::ErrorInfo;
use crate::settings::{Config, DEFAULT_DEBOUNCE_MS};

pub use controller::SearchController;
pub use debounce::Debouncer;

/// Where a search session is in its debounce/fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Empty,
    Debouncing,
    Fetching,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Quiet period after the last edit before the query settles.
    pub debounce: Duration,
    /// Load the discovery listing as soon as the controller is created.
    pub auto_start: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            auto_start: true,
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            ..Self::default()
        }
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }
}

/// What a search screen should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    /// Nothing loaded yet.
    Prompt,
    Loading,
    Failed(ErrorInfo),
    /// Listing shown while no query is active.
    Browse(Vec<Movie>),
    Results { query: String, movies: Vec<Movie> },
    NoResults { query: String },
}
