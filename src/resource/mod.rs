//! Async resources - observable loading/data/error state around a producer.
//!
//! An [`AsyncResource`] binds a zero-argument asynchronous producer and turns
//! its invocations into a [`ResourceState`]. Invocations are numbered; only the
//! most recently started one (the authoritative invocation) may write state,
//! so a slow early response can never overwrite a newer one.
//!
//! ## Example
//!
//! ```ignore
//! use reeltrend::{AsyncResource, ResourceState};
//!
//! let movies = AsyncResource::bind(move || {
//!     let catalog = catalog.clone();
//!     async move { catalog.query_movies(None).await }
//! }, true);
//!
//! let settlement = movies.refetch().await;
//! if let ResourceState::Success(list) = movies.state() {
//!     println!("{} movies", list.len());
//! }
//! ```

mod controller;
mod invocation;

use crate::error::ErrorInfo;

pub use controller::AsyncResource;
pub use invocation::{Invocation, Settlement};

/// Observable state of an [`AsyncResource`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(ErrorInfo),
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState::Idle
    }
}

impl<T> ResourceState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ResourceState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ResourceState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            ResourceState::Failure(error) => Some(error),
            _ => None,
        }
    }
}

/// Published whenever an authoritative invocation writes new data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChanged<T> {
    /// Generation of the invocation that produced `data`.
    pub generation: u64,
    pub data: T,
}
