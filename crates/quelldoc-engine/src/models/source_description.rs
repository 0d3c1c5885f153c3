use indexmap::IndexMap;
use serde::Serialize;

/// The fully assembled record for one manuscript source.
///
/// Built once per conversion run and discarded after serialization; field
/// order here is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescription {
    pub siglum: String,
    /// True when the siglum was bracket-delimited in the source text,
    /// marking a source known only indirectly.
    pub is_missing: bool,
    #[serde(rename = "type")]
    pub source_type: String,
    pub location: String,
    pub description: String,
    /// Category name to ordered entries, in declaration order. Absent
    /// categories are omitted entirely, never serialized as empty.
    pub categories: IndexMap<String, Vec<String>>,
    pub contents: Vec<ContentItem>,
}

impl SourceDescription {
    /// Renders the record as pretty-printed JSON with a trailing newline.
    ///
    /// Output is deterministic: struct field order and `IndexMap` insertion
    /// order fully determine the byte sequence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// One named musical passage or sketch fragment described within the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    /// Label line text without its structural trailing colon. Bold-marked
    /// sigla embedded in the label are preserved verbatim as plain text.
    pub label: String,
    /// Never empty: an item without location lines is rejected during
    /// parsing.
    pub locations: Vec<ContentLocation>,
}

/// A folio or page reference with the systems described on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLocation {
    pub unit_type: UnitType,
    /// Leaf or page number, e.g. "1r" or "2".
    pub unit_id: String,
    /// System/measure pairs in document order. Multiple systems sharing one
    /// folio are multiple entries here, never separate locations.
    pub systems: Vec<SystemGroup>,
}

/// Whether a location line used leaf-recto/verso notation ("Bl.") or page
/// numbering ("S.").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Folio,
    Page,
}

/// One system range with the measures it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemGroup {
    /// System range, possibly annotated with a side indicator, e.g.
    /// "8–9 (rechts)".
    pub system: String,
    /// Measure reference as written, e.g. "T. 15" or a range.
    pub measures: String,
}
