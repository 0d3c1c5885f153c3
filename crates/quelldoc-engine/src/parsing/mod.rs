//! Parsing pipeline: paragraphs in, a [`SourceDescription`] out.
//!
//! Runs in fixed stages over one shared block cursor: block extraction,
//! head, categories, content. Each stage consumes exactly the blocks it
//! owns; fatal errors abort the run, format warnings accumulate.

pub mod blocks;
pub mod categories;
pub mod content;
pub mod error;
pub mod head;

pub use blocks::{Block, BlockCursor, FormatSpan, extract_blocks};
pub use error::{FormatWarning, ParseError};

use crate::docx::DocxParagraph;
use crate::models::SourceDescription;

/// Result of a successful parse: the assembled record plus any non-fatal
/// format deviations encountered along the way.
#[derive(Debug)]
pub struct ParseOutcome {
    pub description: SourceDescription,
    pub warnings: Vec<FormatWarning>,
}

/// Parses one source-description document.
pub fn parse_document(paras: &[DocxParagraph]) -> Result<ParseOutcome, ParseError> {
    let blocks = extract_blocks(paras);
    let mut cursor = BlockCursor::new(&blocks);
    let mut warnings = Vec::new();

    let head = head::parse_head(&mut cursor, &mut warnings)?;
    let categories = categories::parse_categories(&mut cursor, &mut warnings)?;
    let contents = content::parse_contents(&mut cursor)?;

    Ok(ParseOutcome {
        description: SourceDescription {
            siglum: head.siglum,
            is_missing: head.is_missing,
            source_type: head.source_type,
            location: head.location,
            description: head.description,
            categories,
            contents,
        },
        warnings,
    })
}
