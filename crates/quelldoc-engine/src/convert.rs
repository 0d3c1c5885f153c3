//! One-call conversion: docx in, json out.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::docx;
use crate::io::{self, IoError};
use crate::models::SourceDescription;
use crate::parsing::{self, FormatWarning, ParseError};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// What a successful conversion produced.
#[derive(Debug)]
pub struct ConvertReport {
    pub output_path: PathBuf,
    pub description: SourceDescription,
    pub warnings: Vec<FormatWarning>,
}

/// Converts `<dir>/<name>.docx` into `<dir>/<name>.json`.
///
/// The output file is only written after the whole document has parsed;
/// any error leaves the target untouched.
pub fn convert_source_description(dir: &Path, name: &str) -> Result<ConvertReport, ConvertError> {
    let source = io::require_source(dir, name)?;
    log::info!("reading {}", source.display());

    let paragraphs = docx::read_paragraphs(&source)?;
    let outcome = parsing::parse_document(&paragraphs)?;

    let output_path = io::target_path(dir, name);
    io::write_json(&output_path, &outcome.description)?;
    log::info!("wrote {}", output_path.display());

    Ok(ConvertReport {
        output_path,
        description: outcome.description,
        warnings: outcome.warnings,
    })
}
