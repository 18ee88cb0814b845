pub mod context;
pub mod lifecycle;

pub use lifecycle::{run_ingest_file, run_standalone};
