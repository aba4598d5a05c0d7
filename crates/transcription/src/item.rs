use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known attribute keys. Formatting kinds are added independently of
/// the model, so attributes stay an open string map.
pub mod attr {
    pub const FORMAT: &str = "format";
    pub const NORMALIZATION: &str = "normalization";
    pub const NORMALIZATION_TYPE: &str = "normalization_type";
    pub const DELETION: &str = "deletion";
    pub const CLARITY: &str = "clarity";
    pub const CLARITY_REASON: &str = "clarity_reason";
    pub const ALTERNATE_TEXT: &str = "alternate_text";
    pub const LOCATION: &str = "location";
}

/// Editorial marks. They carry no comparable text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    Note,
    Reference,
    /// A word continues across a line break at this point.
    NoWordBreak,
    ChunkStart,
    ChunkEnd,
    ParagraphMark,
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Text { text: String },
    Mark { mark_type: MarkType, text: String },
    Gap { length: usize },
}

/// Smallest unit of transcribed content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub hand: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Item {
    fn with_kind(kind: ItemKind) -> Self {
        Self {
            kind,
            language: String::new(),
            hand: 0,
            attributes: BTreeMap::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Text { text: text.into() })
    }

    pub fn mark(mark_type: MarkType) -> Self {
        Self::with_kind(ItemKind::Mark {
            mark_type,
            text: String::new(),
        })
    }

    /// A note or other mark with editorial text attached.
    pub fn mark_with_text(mark_type: MarkType, text: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Mark {
            mark_type,
            text: text.into(),
        })
    }

    pub fn no_word_break() -> Self {
        Self::mark(MarkType::NoWordBreak)
    }

    pub fn gap(length: usize) -> Self {
        Self::with_kind(ItemKind::Gap { length })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_hand(mut self, hand: u32) -> Self {
        self.hand = hand;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets a normalized reading, e.g. an expanded abbreviation.
    pub fn with_normalization(self, normalized: impl Into<String>, kind: impl Into<String>) -> Self {
        self.with_attribute(attr::NORMALIZATION, normalized)
            .with_attribute(attr::NORMALIZATION_TYPE, kind)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self.kind, ItemKind::Text { .. })
    }

    pub fn is_mark(&self) -> bool {
        matches!(self.kind, ItemKind::Mark { .. })
    }

    pub fn is_gap(&self) -> bool {
        matches!(self.kind, ItemKind::Gap { .. })
    }

    pub fn mark_type(&self) -> Option<&MarkType> {
        match &self.kind {
            ItemKind::Mark { mark_type, .. } => Some(mark_type),
            _ => None,
        }
    }

    pub fn is_no_word_break(&self) -> bool {
        self.mark_type() == Some(&MarkType::NoWordBreak)
    }

    /// Text of a text item; empty for marks and gaps.
    pub fn plain_text(&self) -> &str {
        match &self.kind {
            ItemKind::Text { text } => text,
            _ => "",
        }
    }

    /// The normalized reading when one is set, otherwise the plain text.
    pub fn normalized_text(&self) -> &str {
        match (
            self.attribute(attr::NORMALIZATION_TYPE),
            self.attribute(attr::NORMALIZATION),
        ) {
            (Some(kind), Some(normalized)) if !kind.is_empty() && self.is_textual() => normalized,
            _ => self.plain_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_only_for_text_items() {
        assert_eq!(Item::text("abc").plain_text(), "abc");
        assert_eq!(Item::mark_with_text(MarkType::Note, "a note").plain_text(), "");
        assert_eq!(Item::gap(3).plain_text(), "");
    }

    #[test]
    fn normalized_text_needs_a_type() {
        let item = Item::text("dns").with_normalization("dominus", "abbreviation");
        assert_eq!(item.normalized_text(), "dominus");
        assert_eq!(item.plain_text(), "dns");

        let untyped = Item::text("dns").with_attribute(attr::NORMALIZATION, "dominus");
        assert_eq!(untyped.normalized_text(), "dns");
    }

    #[test]
    fn mark_queries() {
        let nwb = Item::no_word_break();
        assert!(nwb.is_mark());
        assert!(nwb.is_no_word_break());
        assert!(!Item::mark(MarkType::Note).is_no_word_break());
        assert!(Item::gap(1).is_gap());
        assert_eq!(Item::text("x").mark_type(), None);
    }

    #[test]
    fn item_serializes_with_type_tag() {
        let item = Item::text("verbum").with_language("la").with_hand(1);
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["kind"]["type"], "text");
        assert_eq!(json["kind"]["text"], "verbum");
        assert_eq!(json["language"], "la");
        assert!(json.get("attributes").is_none());
    }
}
