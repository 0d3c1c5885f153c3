//! Block extraction: phase 1 of the conversion.
//!
//! Turns the formatted-paragraph stream into an ordered sequence of
//! [`Block`]s, each carrying only local facts: plain text, inline formatting
//! spans, and leading-tab count. No context from surrounding paragraphs is
//! consulted except blank-line separation.

use crate::docx::DocxParagraph;

/// Byte range of formatted text within a block's `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpan {
    pub start: usize,
    pub end: usize,
    pub bold: bool,
    pub superscript: bool,
}

/// One non-blank paragraph with its local classification facts.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Position among non-blank paragraphs; used in diagnostics.
    pub index: usize,
    /// Paragraph text with the leading tab run stripped and trailing
    /// whitespace trimmed. Interior tabs are preserved.
    pub text: String,
    /// Formatted (bold and/or superscript) ranges into `text`.
    pub spans: Vec<FormatSpan>,
    /// Number of tabs the paragraph started with.
    pub leading_tabs: usize,
    /// Whether one or more blank paragraphs preceded this block.
    pub blank_before: bool,
}

impl Block {
    /// Merged bold region of this block, if the block has exactly one.
    ///
    /// Adjacent formatted spans are merged so that a siglum written as
    /// bold + bold-superscript runs ("G" + "H") counts as a single span.
    /// Returns `None` when there is no bold text, more than one separate
    /// bold region, or non-whitespace text outside the region.
    pub fn single_bold_span(&self) -> Option<(usize, usize)> {
        let mut merged: Vec<(usize, usize)> = Vec::new();
        for span in &self.spans {
            match merged.last_mut() {
                Some((_, end)) if *end == span.start => *end = span.end,
                _ => merged.push((span.start, span.end)),
            }
        }
        match merged.as_slice() {
            &[(start, end)] => {
                let outside_is_blank = self.text[..start].trim().is_empty()
                    && self.text[end..].trim().is_empty();
                let has_bold = self
                    .spans
                    .iter()
                    .any(|s| s.bold && s.start >= start && s.end <= end);
                (outside_is_blank && has_bold).then_some((start, end))
            }
            _ => None,
        }
    }
}

/// Extracts blocks from the paragraph stream. Pure transform: blank
/// paragraphs are dropped but recorded as `blank_before` on their successor.
pub fn extract_blocks(paras: &[DocxParagraph]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut blank_before = false;

    for para in paras {
        let mut text = String::new();
        let mut spans = Vec::new();
        for run in &para.runs {
            let start = text.len();
            text.push_str(&run.text);
            if run.bold || run.superscript {
                spans.push(FormatSpan {
                    start,
                    end: text.len(),
                    bold: run.bold,
                    superscript: run.superscript,
                });
            }
        }

        if text.trim().is_empty() {
            blank_before = true;
            continue;
        }

        let leading_tabs = text.bytes().take_while(|&b| b == b'\t').count();
        let trimmed_len = text.trim_end().len();
        let text: String = text[leading_tabs..trimmed_len].to_string();
        let spans = spans
            .into_iter()
            .filter_map(|s| {
                let start = s.start.max(leading_tabs) - leading_tabs;
                let end = s.end.min(trimmed_len).saturating_sub(leading_tabs);
                (end > start).then_some(FormatSpan { start, end, ..s })
            })
            .collect();

        blocks.push(Block {
            index: blocks.len(),
            text,
            spans,
            leading_tabs,
            blank_before,
        });
        blank_before = false;
    }

    blocks
}

/// Exclusive cursor over the block sequence, handed off stage to stage.
#[derive(Debug)]
pub struct BlockCursor<'a> {
    blocks: &'a [Block],
    pos: usize,
}

impl<'a> BlockCursor<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self { blocks, pos: 0 }
    }

    /// The next block without consuming it.
    pub fn peek(&self) -> Option<&'a Block> {
        self.blocks.get(self.pos)
    }

    /// Consumes and returns the next block.
    pub fn advance(&mut self) -> Option<&'a Block> {
        let block = self.blocks.get(self.pos);
        if block.is_some() {
            self.pos += 1;
        }
        block
    }

    /// Index of the last consumed block, for diagnostics at end-of-input.
    pub fn last_index(&self) -> usize {
        self.pos.saturating_sub(1)
    }
}
