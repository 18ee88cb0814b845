// Domain entities

pub mod config;
pub mod event;
pub mod metadata;
pub mod query;
pub mod record;

pub use config::*;
pub use event::*;
pub use metadata::*;
pub use query::*;
pub use record::*;
