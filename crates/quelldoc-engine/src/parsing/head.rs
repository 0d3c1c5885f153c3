//! Head parsing: the five mandatory leading blocks of a source description.
//!
//! Order is fixed: heading, bold siglum, type, location, general
//! description. Violations of the five-line contract are fatal; a missing
//! trailing dot on lines 3-5 only records a warning.

use super::blocks::{Block, BlockCursor};
use super::error::{FormatWarning, ParseError};

/// The parsed head fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub siglum: String,
    pub is_missing: bool,
    pub source_type: String,
    pub location: String,
    pub description: String,
}

pub fn parse_head(
    cursor: &mut BlockCursor<'_>,
    warnings: &mut Vec<FormatWarning>,
) -> Result<Head, ParseError> {
    // Block 1: the document heading. Presence only, content discarded.
    take(cursor, "the document heading")?;

    let siglum_block = take(cursor, "the bold siglum line")?;
    let (siglum, is_missing) = parse_siglum(siglum_block)?;
    if !siglum_block.blank_before {
        warnings.push(FormatWarning::new(
            siglum_block.index,
            "siglum line is not separated from the heading by a blank paragraph",
        ));
    }

    let source_type = dotted_field(take(cursor, "the type line")?, "type line", warnings);
    let location = dotted_field(take(cursor, "the location line")?, "location line", warnings);
    let description = dotted_field(
        take(cursor, "the description line")?,
        "description line",
        warnings,
    );

    Ok(Head {
        siglum,
        is_missing,
        source_type,
        location,
        description,
    })
}

fn take<'a>(cursor: &mut BlockCursor<'a>, what: &str) -> Result<&'a Block, ParseError> {
    cursor.advance().ok_or_else(|| {
        ParseError::head(
            cursor.last_index() + 1,
            format!("expected {what}, found end of document"),
        )
    })
}

/// The siglum line must carry exactly one bold (or bold+superscript) span;
/// its plain text is the siglum. A bracket-delimited siglum marks a missing
/// source and the brackets are stripped.
fn parse_siglum(block: &Block) -> Result<(String, bool), ParseError> {
    let (start, end) = block.single_bold_span().ok_or_else(|| {
        ParseError::head(
            block.index,
            "siglum line must consist of exactly one bold span",
        )
    })?;
    let raw = block.text[start..end].trim();

    match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        Some(inner) => Ok((inner.to_string(), true)),
        None => Ok((raw.to_string(), false)),
    }
}

/// Lines 3-5 are stored verbatim; a missing trailing dot is recorded but
/// never inferred.
fn dotted_field(block: &Block, what: &str, warnings: &mut Vec<FormatWarning>) -> String {
    if !block.text.ends_with('.') {
        warnings.push(FormatWarning::new(
            block.index,
            format!("{what} does not end with a dot"),
        ));
    }
    block.text.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{DocxParagraph, DocxRun};
    use crate::parsing::blocks::extract_blocks;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> DocxParagraph {
        DocxParagraph {
            runs: vec![DocxRun::plain(text)],
        }
    }

    fn bold_para(text: &str) -> DocxParagraph {
        DocxParagraph {
            runs: vec![DocxRun::bold(text)],
        }
    }

    fn head_paras(siglum: &str) -> Vec<DocxParagraph> {
        vec![
            para("Werkausgabe Quellen"),
            DocxParagraph::default(),
            bold_para(siglum),
            para("Skizzen."),
            para("CH-Bps, Sammlung Anton Webern."),
            para("1 Blatt. Notenpapier, 12-zeilig."),
        ]
    }

    fn parse(paras: &[DocxParagraph]) -> (Result<Head, ParseError>, Vec<FormatWarning>) {
        let blocks = extract_blocks(paras);
        let mut cursor = BlockCursor::new(&blocks);
        let mut warnings = Vec::new();
        let head = parse_head(&mut cursor, &mut warnings);
        (head, warnings)
    }

    #[test]
    fn parses_all_five_fields() {
        let (head, warnings) = parse(&head_paras("B"));
        let head = head.unwrap();
        assert_eq!(head, Head {
            siglum: "B".to_string(),
            is_missing: false,
            source_type: "Skizzen.".to_string(),
            location: "CH-Bps, Sammlung Anton Webern.".to_string(),
            description: "1 Blatt. Notenpapier, 12-zeilig.".to_string(),
        });
        assert!(warnings.is_empty());
    }

    #[test]
    fn bracketed_siglum_sets_missing_flag() {
        let (head, _) = parse(&head_paras("[B]"));
        let head = head.unwrap();
        assert_eq!(head.siglum, "B");
        assert!(head.is_missing);
    }

    #[test]
    fn superscript_addendum_joins_siglum() {
        let mut paras = head_paras("G");
        paras[2].runs.push(DocxRun {
            text: "H".to_string(),
            bold: true,
            superscript: true,
        });
        let (head, _) = parse(&paras);
        assert_eq!(head.unwrap().siglum, "GH");
    }

    #[test]
    fn missing_bold_is_fatal() {
        let mut paras = head_paras("B");
        paras[2] = para("B");
        let (head, _) = parse(&paras);
        assert!(matches!(
            head.unwrap_err(),
            ParseError::HeadStructure { index: 1, .. }
        ));
    }

    #[test]
    fn truncated_head_is_fatal() {
        let paras = head_paras("B");
        let (head, _) = parse(&paras[..4]);
        assert!(matches!(head.unwrap_err(), ParseError::HeadStructure { .. }));
    }

    #[test]
    fn missing_trailing_dot_warns_but_keeps_text() {
        let mut paras = head_paras("B");
        paras[3] = para("Skizzen");
        let (head, warnings) = parse(&paras);
        assert_eq!(head.unwrap().source_type, "Skizzen");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, 2);
        assert!(warnings[0].message.contains("type line"));
    }

    #[test]
    fn missing_blank_separation_warns() {
        let mut paras = head_paras("B");
        paras.remove(1);
        let (head, warnings) = parse(&paras);
        assert!(head.is_ok());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("blank paragraph"));
    }
}
