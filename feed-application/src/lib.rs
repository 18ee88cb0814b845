// Feed Application Layer

pub mod commands;
pub mod error;
pub mod feed_cursor;
pub mod metrics;
pub mod name_cache;
pub mod ops;
pub mod queries;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AppError;
pub use feed_cursor::FeedCursor;
pub use metrics::Metrics;
pub use name_cache::NameCache;
pub use ops::FeedStreamHub;
pub use state::AppState;
