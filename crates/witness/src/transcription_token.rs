use serde::{Deserialize, Serialize};

use token::{IntRange, Token, TokenType};
use transcription::ItemAddressInDocument;

/// A line inside a text box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TextBoxLine {
    pub text_box_index: i32,
    pub line: usize,
}

/// First and last text box line a token touches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TextBoxLineRange {
    pub start: TextBoxLine,
    pub end: TextBoxLine,
}

impl TextBoxLineRange {
    pub fn new(text_box_index: i32, start_line: usize, end_line: usize) -> Self {
        Self {
            start: TextBoxLine {
                text_box_index,
                line: start_line,
            },
            end: TextBoxLine {
                text_box_index,
                line: end_line,
            },
        }
    }
}

/// A token with the source items it came from.
///
/// The three source vectors are parallel: one entry per contributing item,
/// in item order. `source_item_indexes` are positions in the witness's
/// flattened item list and are always contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionToken {
    #[serde(flatten)]
    pub token: Token,
    pub source_item_indexes: Vec<usize>,
    pub source_item_addresses: Vec<ItemAddressInDocument>,
    /// Characters of each source item covered by the token.
    pub source_item_char_ranges: Vec<IntRange>,
    pub text_box_line_range: TextBoxLineRange,
}

impl TranscriptionToken {
    pub(crate) fn from_string_token(
        mut token: Token,
        item_index: usize,
        address: ItemAddressInDocument,
        lines: TextBoxLineRange,
    ) -> Self {
        let char_range = token.char_range.take().unwrap_or_default();
        token.line_range = None;
        Self {
            token,
            source_item_indexes: vec![item_index],
            source_item_addresses: vec![address],
            source_item_char_ranges: vec![char_range],
            text_box_line_range: lines,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token.token_type
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn normalization(&self) -> &str {
        &self.token.normalization
    }

    pub fn is_equivalent(&self, other: &TranscriptionToken) -> bool {
        self.token.is_equivalent(&other.token)
    }

    /// Records an item that belongs to the token without adding text to it,
    /// such as a no-word-break mark.
    pub(crate) fn add_silent_source(
        &mut self,
        item_index: usize,
        address: ItemAddressInDocument,
        range: IntRange,
    ) {
        self.push_source(item_index, address, range);
    }

    /// Appends `next`, which must come right after this token in item order.
    pub(crate) fn append(&mut self, next: TranscriptionToken) {
        self.token.text.push_str(&next.token.text);
        self.token.normalization.push_str(&next.token.normalization);
        for ((index, address), range) in next
            .source_item_indexes
            .into_iter()
            .zip(next.source_item_addresses)
            .zip(next.source_item_char_ranges)
        {
            self.push_source(index, address, range);
        }
        self.text_box_line_range.end = next.text_box_line_range.end;
    }

    fn push_source(&mut self, item_index: usize, address: ItemAddressInDocument, range: IntRange) {
        // a second piece of the same item widens that item's range
        if self.source_item_indexes.last() == Some(&item_index) {
            if let Some(last) = self.source_item_char_ranges.last_mut() {
                let start = last.start.min(range.start);
                let end = last.end().max(range.end());
                *last = IntRange::new(start, end - start);
            }
            return;
        }
        self.source_item_indexes.push(item_index);
        self.source_item_addresses.push(address);
        self.source_item_char_ranges.push(range);
    }
}

impl AsRef<Token> for TranscriptionToken {
    fn as_ref(&self) -> &Token {
        &self.token
    }
}

impl AsMut<Token> for TranscriptionToken {
    fn as_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(text: &str, index: usize, range: IntRange, line: usize) -> TranscriptionToken {
        TranscriptionToken::from_string_token(
            Token::word(text).with_char_range(range),
            index,
            ItemAddressInDocument::new(1, 0, index as i32),
            TextBoxLineRange::new(0, line, line),
        )
    }

    #[test]
    fn string_position_moves_into_provenance() {
        let t = piece("abc", 2, IntRange::new(4, 3), 1);
        assert_eq!(t.token.char_range, None);
        assert_eq!(t.token.line_range, None);
        assert_eq!(t.source_item_char_ranges, vec![IntRange::new(4, 3)]);
    }

    #[test]
    fn append_joins_text_and_sources() {
        let mut t = piece("some", 0, IntRange::new(0, 4), 1);
        t.append(piece("text", 1, IntRange::new(0, 4), 2));
        assert_eq!(t.text(), "sometext");
        assert_eq!(t.normalization(), "sometext");
        assert_eq!(t.source_item_indexes, vec![0, 1]);
        assert_eq!(t.text_box_line_range, TextBoxLineRange::new(0, 1, 2));
    }

    #[test]
    fn same_item_pieces_widen_the_range() {
        let mut t = piece("te", 3, IntRange::new(5, 2), 1);
        t.add_silent_source(4, ItemAddressInDocument::new(1, 0, 4), IntRange::new(0, 0));
        t.add_silent_source(5, ItemAddressInDocument::new(1, 0, 5), IntRange::new(0, 1));
        t.append(piece("xt", 5, IntRange::new(1, 2), 2));
        assert_eq!(t.source_item_indexes, vec![3, 4, 5]);
        assert_eq!(
            t.source_item_char_ranges,
            vec![IntRange::new(5, 2), IntRange::new(0, 0), IntRange::new(0, 3)]
        );
    }

    #[test]
    fn flattened_token_fields_in_json() {
        let t = piece("verbum", 0, IntRange::new(0, 6), 1);
        let json = serde_json::to_value(&t).expect("serialize");
        assert_eq!(json["type"], "word");
        assert_eq!(json["text"], "verbum");
        assert_eq!(json["sourceItemIndexes"][0], 0);
        assert_eq!(json["textBoxLineRange"]["start"]["line"], 1);
    }
}
