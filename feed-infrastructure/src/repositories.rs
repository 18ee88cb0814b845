pub mod redis_index;

pub use redis_index::*;
