pub mod feed_client;
pub mod feed_poller;
pub mod name_lookup;

pub use feed_client::*;
pub use feed_poller::*;
pub use name_lookup::*;
