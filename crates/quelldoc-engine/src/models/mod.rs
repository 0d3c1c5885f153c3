pub mod source_description;

pub use source_description::*;
