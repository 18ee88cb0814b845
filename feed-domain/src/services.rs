// Record codec and query compiler

pub mod event_decoder;
pub mod event_encoder;
pub mod metadata_codec;
pub mod query_compiler;
pub mod tag_codec;

pub use event_decoder::EventDecoder;
pub use event_encoder::EventEncoder;
pub use query_compiler::QueryCompiler;
