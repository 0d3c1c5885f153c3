pub mod convert;
pub mod docx;
pub mod io;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use convert::{ConvertError, ConvertReport, convert_source_description};
pub use models::*;
pub use parsing::{FormatWarning, ParseError, ParseOutcome, parse_document};
