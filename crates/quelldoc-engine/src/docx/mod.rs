//! Reads the rendered text+formatting view out of a .docx file.
//!
//! A .docx is a zip archive whose `word/document.xml` entry holds the
//! paragraph stream. Only the markup the converter consumes is recognized:
//! paragraphs (`w:p`), runs (`w:r`) with bold/superscript run properties,
//! text (`w:t`), tabs (`w:tab`), and breaks (`w:br`). Everything else is
//! skipped. Any zip or XML failure maps to
//! [`ParseError::MalformedDocument`](crate::parsing::ParseError).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::parsing::ParseError;

/// A single formatted run within a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxRun {
    pub text: String,
    pub bold: bool,
    pub superscript: bool,
}

impl DocxRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            superscript: false,
        }
    }
}

/// One paragraph as a sequence of formatted runs. A paragraph with no runs
/// (or only whitespace runs) is a blank paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxParagraph {
    pub runs: Vec<DocxRun>,
}

impl DocxParagraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Reads all paragraphs from the document at `path`.
pub fn read_paragraphs(path: &Path) -> Result<Vec<DocxParagraph>, ParseError> {
    let file = File::open(path).map_err(|e| {
        ParseError::MalformedDocument(format!("cannot open {}: {e}", path.display()))
    })?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ParseError::MalformedDocument(format!("not a docx archive: {e}")))?;
    let mut entry = archive.by_name("word/document.xml").map_err(|e| {
        ParseError::MalformedDocument(format!("archive has no word/document.xml: {e}"))
    })?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::MalformedDocument(format!("cannot read document.xml: {e}")))?;
    parse_document_xml(&xml)
}

/// Parses the `word/document.xml` markup into paragraphs of runs.
///
/// Blank paragraphs are kept; the block extractor needs them to detect
/// blank-line separation.
pub fn parse_document_xml(xml: &str) -> Result<Vec<DocxParagraph>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut runs: Vec<DocxRun> = Vec::new();
    let mut run = DocxRun::default();

    let mut in_paragraph = false;
    let mut in_para_props = false;
    let mut in_run = false;
    let mut in_run_props = false;
    let mut in_text = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    in_paragraph = true;
                    runs.clear();
                }
                b"pPr" => in_para_props = true,
                b"r" if in_paragraph && !in_para_props => {
                    in_run = true;
                    run = DocxRun::default();
                }
                b"rPr" if in_run => in_run_props = true,
                b"b" if in_run_props => run.bold = bool_val(e),
                b"vertAlign" if in_run_props => {
                    run.superscript = attr_val(e).as_deref() == Some("superscript");
                }
                b"t" if in_run && !in_run_props => in_text = true,
                b"tab" if in_run && !in_run_props => run.text.push('\t'),
                b"br" if in_run && !in_run_props => run.text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"b" if in_run_props => run.bold = bool_val(e),
                b"vertAlign" if in_run_props => {
                    run.superscript = attr_val(e).as_deref() == Some("superscript");
                }
                b"tab" if in_run && !in_run_props => run.text.push('\t'),
                b"br" if in_run && !in_run_props => run.text.push('\n'),
                b"p" => paragraphs.push(DocxParagraph::default()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e.unescape().map_err(|e| {
                        ParseError::MalformedDocument(format!("bad text content: {e}"))
                    })?;
                    // Word writes non-breaking spaces after unit markers.
                    run.text.extend(text.chars().map(|c| match c {
                        '\u{a0}' => ' ',
                        c => c,
                    }));
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"rPr" => in_run_props = false,
                b"pPr" => in_para_props = false,
                b"r" if in_run => {
                    if !run.text.is_empty() {
                        runs.push(std::mem::take(&mut run));
                    }
                    in_run = false;
                }
                b"p" if in_paragraph => {
                    paragraphs.push(DocxParagraph {
                        runs: std::mem::take(&mut runs),
                    });
                    in_paragraph = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::MalformedDocument(format!(
                    "document.xml is not well-formed: {e}"
                )));
            }
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Strips the namespace prefix from a qualified element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

fn attr_val(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == b"val")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Toggle properties like `w:b` default to true; an explicit val of
/// "0"/"false"/"none" turns them off.
fn bool_val(e: &BytesStart) -> bool {
    match attr_val(e).as_deref() {
        Some("0") | Some("false") | Some("none") | Some("off") => false,
        _ => true,
    }
}
