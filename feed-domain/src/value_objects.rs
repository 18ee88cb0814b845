// Domain value objects
pub mod tag_field;

pub use tag_field::*;
