pub mod feed_stream_hub;

pub use feed_stream_hub::FeedStreamHub;
