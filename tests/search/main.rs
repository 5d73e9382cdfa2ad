//! SearchController integration tests.
//!
//! All tests run on a paused clock, so the debounce window is crossed by
//! sleeping and the order of timers is deterministic.

mod debounce;
mod view;
