//! Trending leaderboard and home feed integration tests.

mod concurrency;
mod home;
mod leaderboard;
