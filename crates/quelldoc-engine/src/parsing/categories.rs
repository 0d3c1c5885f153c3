//! Category parsing: labeled description blocks between head and content.
//!
//! Each block is classified exactly once as a new category, a continuation
//! of the previous one, or the content sentinel; the parser loop consumes
//! the tagged results uniformly.

use indexmap::IndexMap;

use super::blocks::{Block, BlockCursor};
use super::error::{FormatWarning, ParseError};

/// The recognized category labels, in their fixed document order.
pub const CATEGORY_LABELS: [&str; 8] = [
    "Beschreibstoff:",
    "Schreibstoff:",
    "Titel:",
    "Datierung:",
    "Paginierung:",
    "Taktzahlen:",
    "Besetzung:",
    "Eintragungen:",
];

/// Sentinel line opening the content section.
pub const CONTENT_SENTINEL: &str = "Inhalt:";

#[derive(Debug, PartialEq, Eq)]
enum CategoryLine<'a> {
    NewCategory { label: &'static str, rest: &'a str },
    Continuation(&'a str),
    SectionSentinel,
}

fn classify(block: &Block) -> CategoryLine<'_> {
    let text = block.text.trim_start();
    if text.starts_with(CONTENT_SENTINEL) {
        return CategoryLine::SectionSentinel;
    }
    for label in CATEGORY_LABELS {
        if let Some(rest) = text.strip_prefix(label) {
            return CategoryLine::NewCategory {
                label,
                rest: rest.trim(),
            };
        }
    }
    CategoryLine::Continuation(text)
}

/// Consumes blocks up to (not including) the content sentinel.
///
/// Absent categories are omitted from the mapping; an empty mapping is
/// valid. Reaching end-of-document before the sentinel is fatal.
pub fn parse_categories(
    cursor: &mut BlockCursor<'_>,
    warnings: &mut Vec<FormatWarning>,
) -> Result<IndexMap<String, Vec<String>>, ParseError> {
    let mut categories = IndexMap::new();
    let mut current: Option<(&'static str, String)> = None;

    loop {
        let Some(block) = cursor.peek() else {
            return Err(ParseError::MissingContentSection);
        };
        match classify(block) {
            // The sentinel belongs to the content parser; leave it in place.
            CategoryLine::SectionSentinel => break,
            CategoryLine::NewCategory { label, rest } => {
                flush(&mut categories, current.take());
                current = Some((label, rest.to_string()));
            }
            CategoryLine::Continuation(text) => match current.as_mut() {
                Some((_, body)) => {
                    body.push(' ');
                    body.push_str(text);
                }
                None => warnings.push(FormatWarning::new(
                    block.index,
                    "text before the first category label has no category to attach to",
                )),
            },
        }
        cursor.advance();
    }
    flush(&mut categories, current.take());

    Ok(categories)
}

fn flush(categories: &mut IndexMap<String, Vec<String>>, current: Option<(&'static str, String)>) {
    if let Some((label, body)) = current {
        let name = label.trim_end_matches(':').to_string();
        categories.insert(name, split_entries(&body));
    }
}

/// Splits a category body on semicolons into trimmed, dot-terminated
/// entries. Empty segments are dropped.
fn split_entries(body: &str) -> Vec<String> {
    body.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| format!("{}.", entry.trim_end_matches('.')))
        .collect()
}
