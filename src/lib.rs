mod catalog;
mod error;
mod home;
mod resource;
mod search;
mod settings;
mod store;
mod trending;

pub mod logging;

pub use catalog::{Catalog, CatalogError, Movie};
pub use error::ErrorInfo;
pub use home::{HomeFeed, HomeStatus};
pub use resource::{AsyncResource, DataChanged, Invocation, ResourceState, Settlement};
pub use search::{Debouncer, SearchController, SearchOptions, SearchPhase, SearchView};
pub use settings::{
    Config, ConfigError, SearchSettings, StoreSettings, TrendingSettings, DEFAULT_DEBOUNCE_MS,
};
pub use store::{Query, Row, RowStore, StoreError, TableRef};
pub use trending::{
    SearchRecorded, TrendingAggregator, TrendingError, TrendingRecord, DEFAULT_IMAGE_BASE_URL,
    DEFAULT_TRENDING_LIMIT,
};

#[cfg(feature = "in-memory")]
pub use catalog::InMemoryCatalog;
#[cfg(feature = "in-memory")]
pub use store::InMemoryRowStore;
