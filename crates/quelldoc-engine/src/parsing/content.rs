//! Content parsing: the "Inhalt:" section of a source description.
//!
//! An explicit state machine over classified content lines. Tab counts and
//! line terminators drive the transitions; any mismatch is fatal because
//! silently skipping a line would corrupt folio/system alignment.

use std::sync::OnceLock;

use regex::Regex;

use super::blocks::{Block, BlockCursor};
use super::categories::CONTENT_SENTINEL;
use super::error::ParseError;
use crate::models::{ContentItem, ContentLocation, SystemGroup, UnitType};

/// Lines opening the text-critical commentary, which ends the content
/// section. Consumed as a stop marker, never emitted.
pub const END_SENTINELS: [&str; 2] = ["Textkritischer Kommentar:", "Textkritische Anmerkungen:"];

const FOLIO_STR: &str = "Bl.";
const PAGE_STR: &str = "S.";

#[derive(Debug, PartialEq, Eq)]
enum ContentLine<'a> {
    /// No tabs, colon-terminated: opens a new content item.
    Label(&'a str),
    /// One tab, "Bl."/"S." lead: a folio or page line.
    Location,
    /// Two tabs: a further system group on the current folio/page.
    Continuation(&'a str),
    Unrecognized,
}

fn classify(block: &Block) -> ContentLine<'_> {
    match block.leading_tabs {
        0 if block.text.ends_with(':') => ContentLine::Label(&block.text),
        1 if block.text.starts_with(FOLIO_STR) || block.text.starts_with(PAGE_STR) => {
            ContentLine::Location
        }
        2 => ContentLine::Continuation(&block.text),
        _ => ContentLine::Unrecognized,
    }
}

/// How a content line ends. The terminator decides whether the item stays
/// open (`;`) or closes (`.`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Dot,
}

#[derive(Debug)]
enum State {
    ExpectLabel,
    /// Item opened by a label line, no location seen yet.
    ExpectLocation { item: ContentItem },
    /// Item open after a `;`-terminated line; `open` is the location the
    /// next double-tab continuation appends to.
    ExpectMore { item: ContentItem, open: ContentLocation },
}

struct ContentBuilder {
    state: State,
    out: Vec<ContentItem>,
}

impl ContentBuilder {
    fn new() -> Self {
        Self {
            state: State::ExpectLabel,
            out: vec![],
        }
    }

    fn push(&mut self, block: &Block) -> Result<(), ParseError> {
        let state = std::mem::replace(&mut self.state, State::ExpectLabel);
        self.state = match state {
            State::ExpectLabel => match classify(block) {
                ContentLine::Label(text) => State::ExpectLocation {
                    item: ContentItem {
                        label: text.strip_suffix(':').unwrap_or(text).trim_end().to_string(),
                        locations: vec![],
                    },
                },
                _ => {
                    return Err(ParseError::content(
                        block.index,
                        "expected a content label line (no tabs, ending with a colon)",
                    ));
                }
            },
            State::ExpectLocation { item } => match classify(block) {
                ContentLine::Location => {
                    let (location, term) = parse_location(block)?;
                    self.settle(item, location, term)
                }
                _ => {
                    return Err(ParseError::content(
                        block.index,
                        "expected a folio/page line (one tab, starting with \"Bl.\" or \"S.\")",
                    ));
                }
            },
            State::ExpectMore { mut item, open } => match classify(block) {
                ContentLine::Location => {
                    item.locations.push(open);
                    let (location, term) = parse_location(block)?;
                    self.settle(item, location, term)
                }
                ContentLine::Continuation(text) => {
                    let (body, term) = split_terminator(text, block.index)?;
                    let mut open = open;
                    open.systems.push(parse_system(body, block.index)?);
                    self.settle(item, open, term)
                }
                _ => {
                    return Err(ParseError::content(
                        block.index,
                        "expected a continuation (two tabs) or a further folio/page line (one tab)",
                    ));
                }
            },
        };
        Ok(())
    }

    /// Keep the item open on `;`, close both the location and the item
    /// on `.`.
    fn settle(&mut self, mut item: ContentItem, open: ContentLocation, term: Terminator) -> State {
        match term {
            Terminator::Semicolon => State::ExpectMore { item, open },
            Terminator::Dot => {
                item.locations.push(open);
                self.out.push(item);
                State::ExpectLabel
            }
        }
    }

    /// End of the content section. Only legal between items.
    fn finish(self, index: usize) -> Result<Vec<ContentItem>, ParseError> {
        match self.state {
            State::ExpectLabel => Ok(self.out),
            State::ExpectLocation { item } => Err(ParseError::content(
                index,
                format!("content item \"{}\" has no folio/page lines", item.label),
            )),
            State::ExpectMore { item, .. } => Err(ParseError::content(
                index,
                format!(
                    "content item \"{}\" is not closed by a dot-terminated line",
                    item.label
                ),
            )),
        }
    }
}

/// Consumes the sentinel block and all content blocks. End-of-document and
/// the end sentinel are both accepted terminators.
pub fn parse_contents(cursor: &mut BlockCursor<'_>) -> Result<Vec<ContentItem>, ParseError> {
    match cursor.advance() {
        Some(block) if block.text.trim_start().starts_with(CONTENT_SENTINEL) => {}
        Some(block) => {
            return Err(ParseError::content(
                block.index,
                "expected the \"Inhalt:\" sentinel",
            ));
        }
        None => return Err(ParseError::MissingContentSection),
    }

    let mut builder = ContentBuilder::new();
    while let Some(block) = cursor.advance() {
        if is_stop(block) {
            return builder.finish(block.index);
        }
        builder.push(block)?;
    }
    builder.finish(cursor.last_index())
}

fn is_stop(block: &Block) -> bool {
    block.leading_tabs == 0
        && END_SENTINELS
            .iter()
            .any(|sentinel| block.text.starts_with(sentinel))
}

fn split_terminator(text: &str, index: usize) -> Result<(&str, Terminator), ParseError> {
    let text = text.trim_end();
    if let Some(body) = text.strip_suffix(';') {
        Ok((body, Terminator::Semicolon))
    } else if let Some(body) = text.strip_suffix('.') {
        Ok((body, Terminator::Dot))
    } else {
        Err(ParseError::content(
            index,
            "content line must end with ';' or '.'",
        ))
    }
}

fn parse_location(block: &Block) -> Result<(ContentLocation, Terminator), ParseError> {
    let (body, term) = split_terminator(&block.text, block.index)?;

    let (unit_type, rest) = if let Some(rest) = body.strip_prefix(FOLIO_STR) {
        (UnitType::Folio, rest)
    } else if let Some(rest) = body.strip_prefix(PAGE_STR) {
        (UnitType::Page, rest)
    } else {
        return Err(ParseError::content(
            block.index,
            "folio/page line must start with \"Bl.\" or \"S.\"",
        ));
    };

    let rest = rest.trim_start();
    let (unit_id, after) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], &rest[i..]),
        None => {
            return Err(ParseError::content(
                block.index,
                "folio/page line carries no \"System\" entry",
            ));
        }
    };
    if unit_id.is_empty() {
        return Err(ParseError::content(
            block.index,
            "folio/page line is missing its number",
        ));
    }

    let group = parse_system(after, block.index)?;
    Ok((
        ContentLocation {
            unit_type,
            unit_id: unit_id.to_string(),
            systems: vec![group],
        },
        term,
    ))
}

fn system_re() -> &'static Regex {
    static SYSTEM_RE: OnceLock<Regex> = OnceLock::new();
    SYSTEM_RE.get_or_init(|| Regex::new(r"System\s+([^:]+?)\s*:\s*(.*)").expect("invalid regex"))
}

/// Extracts one `System <range>: <measures>` pair. The range may carry a
/// side annotation like "(rechts)".
fn parse_system(text: &str, index: usize) -> Result<SystemGroup, ParseError> {
    let caps = system_re().captures(text).ok_or_else(|| {
        ParseError::content(index, format!("expected \"System <range>:\" in {text:?}"))
    })?;
    Ok(SystemGroup {
        system: caps[1].trim().to_string(),
        measures: caps[2].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{DocxParagraph, DocxRun};
    use crate::parsing::blocks::extract_blocks;
    use pretty_assertions::assert_eq;

    fn paras(texts: &[&str]) -> Vec<DocxParagraph> {
        texts
            .iter()
            .map(|t| DocxParagraph {
                runs: vec![DocxRun::plain(*t)],
            })
            .collect()
    }

    fn parse(texts: &[&str]) -> Result<Vec<ContentItem>, ParseError> {
        let paras = paras(texts);
        let blocks = extract_blocks(&paras);
        let mut cursor = BlockCursor::new(&blocks);
        parse_contents(&mut cursor)
    }

    #[test]
    fn label_and_single_folio_line() {
        let items = parse(&[
            "Inhalt:",
            "I „Das dunkle Herz“ M 314: einzige Textfassung:",
            "\tBl. 1r\tSystem 8–9 (rechts): T. 15.",
        ])
        .unwrap();
        assert_eq!(items, vec![ContentItem {
            label: "I „Das dunkle Herz“ M 314: einzige Textfassung".to_string(),
            locations: vec![ContentLocation {
                unit_type: UnitType::Folio,
                unit_id: "1r".to_string(),
                systems: vec![SystemGroup {
                    system: "8–9 (rechts)".to_string(),
                    measures: "T. 15".to_string(),
                }],
            }],
        }]);
    }

    #[test]
    fn continuation_appends_to_the_same_location() {
        let items = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 2v\tSystem 1–2: T. 1–4;",
            "\t\tSystem 5–6: T. 5–8.",
        ])
        .unwrap();
        assert_eq!(items.len(), 1);
        let location = &items[0].locations[0];
        assert_eq!(location.unit_id, "2v");
        assert_eq!(location.systems, vec![
            SystemGroup {
                system: "1–2".to_string(),
                measures: "T. 1–4".to_string(),
            },
            SystemGroup {
                system: "5–6".to_string(),
                measures: "T. 5–8".to_string(),
            },
        ]);
    }

    #[test]
    fn semicolon_keeps_the_item_open_for_more_folios() {
        let items = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 1r\tSystem 2: T. 1;",
            "\tBl. 1v\tSystem 3: T. 2.",
        ])
        .unwrap();
        assert_eq!(items[0].locations.len(), 2);
        assert_eq!(items[0].locations[0].unit_id, "1r");
        assert_eq!(items[0].locations[1].unit_id, "1v");
    }

    #[test]
    fn page_lines_use_the_page_unit() {
        let items = parse(&[
            "Inhalt:",
            "M 312: Entwurf:",
            "\tS. 2\tSystem 4: T. 3.",
        ])
        .unwrap();
        assert_eq!(items[0].locations[0].unit_type, UnitType::Page);
        assert_eq!(items[0].locations[0].unit_id, "2");
    }

    #[test]
    fn end_of_document_is_a_clean_terminator() {
        let items = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 1r\tSystem 2: T. 1.",
        ])
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn stop_marker_is_consumed_and_ends_the_section() {
        let items = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 1r\tSystem 2: T. 1.",
            "Textkritischer Kommentar:",
        ])
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn empty_content_section_is_valid() {
        let items = parse(&["Inhalt:", "Textkritischer Kommentar:"]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn item_without_location_lines_is_fatal() {
        let err = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "M 311: Entwurf:",
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::ContentStructure { index: 2, .. }));
    }

    #[test]
    fn wrong_tab_depth_is_fatal() {
        let err = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\t\tSystem 2: T. 1.",
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::ContentStructure { .. }));
    }

    #[test]
    fn unterminated_item_at_end_of_document_is_fatal() {
        let err = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 1r\tSystem 2: T. 1;",
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::ContentStructure { .. }));
    }

    #[test]
    fn missing_terminator_is_fatal() {
        let err = parse(&[
            "Inhalt:",
            "M 310: Textfassung:",
            "\tBl. 1r\tSystem 2: T. 1",
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::ContentStructure { index: 2, .. }));
    }

    #[test]
    fn bold_sigla_in_labels_stay_plain_text() {
        let paras = vec![
            DocxParagraph {
                runs: vec![DocxRun::plain("Inhalt:")],
            },
            DocxParagraph {
                runs: vec![
                    DocxRun::bold("M 314"),
                    DocxRun::plain(" (s. "),
                    DocxRun::bold("A"),
                    DocxRun::plain("): einzige Textfassung:"),
                ],
            },
            DocxParagraph {
                runs: vec![DocxRun::plain("\tBl. 1r\tSystem 2: T. 1.")],
            },
        ];
        let blocks = extract_blocks(&paras);
        let mut cursor = BlockCursor::new(&blocks);
        let items = parse_contents(&mut cursor).unwrap();
        assert_eq!(items[0].label, "M 314 (s. A): einzige Textfassung");
    }
}
