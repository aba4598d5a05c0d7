use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Level};

use token::{normalize_tokens, IntRange, LineRange, NormalizerChain, StringTokenizer, TokenType};
use transcription::{DocumentBound, DocumentTranscription, ItemAddressInDocument, ItemInDocument, ItemKind};

use crate::config::WitnessConfig;
use crate::error::WitnessError;
use crate::transcription_token::{TextBoxLineRange, TranscriptionToken};
use crate::witness::TranscriptionWitness;

/// Items next to a token that produced no token themselves (marks, gaps).
///
/// Indexes point into the witness's flattened item list. Only the first
/// token of a witness ever has `pre` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NonTokenItemIndexes {
    pub pre: Vec<usize>,
    pub post: Vec<usize>,
}

impl NonTokenItemIndexes {
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}

/// Tokens of a run of items, with one [`NonTokenItemIndexes`] per token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessTokens {
    pub tokens: Vec<TranscriptionToken>,
    pub non_token_item_indexes: Vec<NonTokenItemIndexes>,
    /// Items that produced no token in a run with no token to attach them
    /// to, e.g. a range holding only marks and gaps. Always empty when
    /// `tokens` is not.
    pub unattached_item_indexes: Vec<usize>,
}

/// Turns document item ranges into witnesses.
#[derive(Debug, Clone)]
pub struct WitnessBuilder {
    tokenizer: StringTokenizer,
    normalizers: Arc<NormalizerChain>,
    cfg: WitnessConfig,
}

impl WitnessBuilder {
    pub fn new(cfg: &WitnessConfig) -> Result<Self, WitnessError> {
        Ok(Self {
            tokenizer: StringTokenizer::new(&cfg.tokenizer)?,
            normalizers: Arc::new(NormalizerChain::from_kinds(&cfg.normalizers)),
            cfg: cfg.clone(),
        })
    }

    pub fn config(&self) -> &WitnessConfig {
        &self.cfg
    }

    /// Builds the witness for the items of `doc` between two bounds.
    pub fn build(
        &self,
        doc: &DocumentTranscription,
        work_id: &str,
        chunk_number: u32,
        lower: DocumentBound,
        upper: DocumentBound,
    ) -> Result<TranscriptionWitness, WitnessError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "witness.build",
            work_id = %work_id,
            chunk_number,
            doc_id = %doc.doc_id,
            lower = ?lower,
            upper = ?upper
        );
        let _guard = span.enter();

        let items = match doc.get_item_range(lower, upper) {
            Ok(items) => items,
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "witness_failure");
                return Err(err.into());
            }
        };

        let WitnessTokens {
            tokens,
            non_token_item_indexes,
            unattached_item_indexes,
        } = self.tokenize_items(&items);

        if !unattached_item_indexes.is_empty() {
            debug!(
                unattached = ?unattached_item_indexes,
                "witness_without_tokens"
            );
        }

        let elapsed_micros = start.elapsed().as_micros();
        info!(
            items = items.len(),
            tokens = tokens.len(),
            non_token_items = non_token_item_indexes
                .iter()
                .map(|n| n.pre.len() + n.post.len())
                .sum::<usize>(),
            elapsed_micros,
            "witness_built"
        );

        Ok(TranscriptionWitness {
            work_id: work_id.to_string(),
            chunk_number,
            doc_id: doc.doc_id.clone(),
            items,
            tokens,
            non_token_item_indexes,
            unattached_item_indexes,
        })
    }

    /// Tokenizes a flattened item list. Never fails.
    ///
    /// Each text item is tokenized on its own and words are joined across
    /// items until something closes them: a non-word token, a mark, a gap,
    /// or a change of text box within a page. Page changes do not close a
    /// word. A text item with no text joins the open word silently, or is
    /// kept next to a token like a mark when no word is open. The configured
    /// normalizers run on the joined words.
    pub fn tokenize_items(&self, items: &[ItemInDocument]) -> WitnessTokens {
        let mut stitcher = Stitcher::new(self.cfg.swallow_newline_after_no_word_break);
        // next line number per (page, text box)
        let mut lines: BTreeMap<(i32, i32), usize> = BTreeMap::new();
        let mut current_box: Option<(i32, i32)> = None;

        for (index, entry) in items.iter().enumerate() {
            let key = (entry.address.page_id, entry.address.address.text_box_index);
            if let Some((page, text_box)) = current_box {
                if page == key.0 && text_box != key.1 {
                    stitcher.close_word();
                }
            }
            current_box = Some(key);

            let item = &entry.item;
            match &item.kind {
                ItemKind::Text { .. } => {
                    let text = if self.cfg.use_normalized_text {
                        item.normalized_text()
                    } else {
                        item.plain_text()
                    };
                    let base = *lines.entry(key).or_insert(1);
                    let tokens = self.tokenizer.tokenize(text, &item.language);
                    if tokens.is_empty() {
                        stitcher.empty_item(index, entry.address);
                    }
                    for token in tokens {
                        let line_range = token.line_range.unwrap_or(LineRange::single(1));
                        let text_box_lines = TextBoxLineRange::new(
                            key.1,
                            base + line_range.start - 1,
                            base + line_range.end - 1,
                        );
                        stitcher.feed(TranscriptionToken::from_string_token(
                            token,
                            index,
                            entry.address,
                            text_box_lines,
                        ));
                    }
                    let newlines = text.chars().filter(|&c| c == '\n').count();
                    lines.insert(key, base + newlines);
                }
                ItemKind::Mark { .. } if item.is_no_word_break() => {
                    stitcher.no_word_break(index, entry.address);
                }
                ItemKind::Mark { .. } | ItemKind::Gap { .. } => stitcher.non_token_item(index),
            }
        }

        let mut witness_tokens = stitcher.finish();
        if !self.normalizers.is_empty() {
            normalize_tokens(&mut witness_tokens.tokens, &*self.normalizers);
        }
        witness_tokens
    }
}

/// Builds a witness with a one-off [`WitnessBuilder`].
pub fn build_witness(
    doc: &DocumentTranscription,
    work_id: &str,
    chunk_number: u32,
    lower: DocumentBound,
    upper: DocumentBound,
    cfg: &WitnessConfig,
) -> Result<TranscriptionWitness, WitnessError> {
    WitnessBuilder::new(cfg)?.build(doc, work_id, chunk_number, lower, upper)
}

/// Word-joining state across items.
struct Stitcher {
    swallow_newline: bool,
    tokens: Vec<TranscriptionToken>,
    non_token: Vec<NonTokenItemIndexes>,
    open_word: Option<TranscriptionToken>,
    /// A no-word-break mark was added to the open word.
    no_word_break_open: bool,
    /// Non-token items seen before the first token.
    pending_pre: Vec<usize>,
}

impl Stitcher {
    fn new(swallow_newline: bool) -> Self {
        Self {
            swallow_newline,
            tokens: Vec::new(),
            non_token: Vec::new(),
            open_word: None,
            no_word_break_open: false,
            pending_pre: Vec::new(),
        }
    }

    fn feed(&mut self, token: TranscriptionToken) {
        if token.token_type() == TokenType::Word {
            match self.open_word.as_mut() {
                Some(word) => {
                    word.append(token);
                    self.no_word_break_open = false;
                }
                None => self.open_word = Some(token),
            }
            return;
        }

        if self.no_word_break_open
            && self.swallow_newline
            && token.token_type() == TokenType::Whitespace
            && token.text() == "\n"
        {
            if let Some(word) = self.open_word.as_mut() {
                absorb_silently(word, token);
            }
            return;
        }

        self.close_word();
        self.push(token);
    }

    fn no_word_break(&mut self, index: usize, address: ItemAddressInDocument) {
        match self.open_word.as_mut() {
            Some(word) => {
                word.add_silent_source(index, address, IntRange::new(0, 0));
                self.no_word_break_open = true;
            }
            None => self.non_token_item(index),
        }
    }

    fn empty_item(&mut self, index: usize, address: ItemAddressInDocument) {
        match self.open_word.as_mut() {
            Some(word) => word.add_silent_source(index, address, IntRange::new(0, 0)),
            None => self.non_token_item(index),
        }
    }

    fn non_token_item(&mut self, index: usize) {
        self.close_word();
        match self.non_token.last_mut() {
            Some(last) => last.post.push(index),
            None => self.pending_pre.push(index),
        }
    }

    fn close_word(&mut self) {
        if let Some(word) = self.open_word.take() {
            self.push(word);
        }
        self.no_word_break_open = false;
    }

    fn push(&mut self, token: TranscriptionToken) {
        let mut adjacent = NonTokenItemIndexes::default();
        if self.tokens.is_empty() {
            adjacent.pre = std::mem::take(&mut self.pending_pre);
        }
        self.tokens.push(token);
        self.non_token.push(adjacent);
    }

    fn finish(mut self) -> WitnessTokens {
        self.close_word();
        WitnessTokens {
            tokens: self.tokens,
            non_token_item_indexes: self.non_token,
            unattached_item_indexes: self.pending_pre,
        }
    }
}

fn absorb_silently(word: &mut TranscriptionToken, token: TranscriptionToken) {
    for ((index, address), range) in token
        .source_item_indexes
        .into_iter()
        .zip(token.source_item_addresses)
        .zip(token.source_item_char_ranges)
    {
        word.add_silent_source(index, address, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token::NormalizerKind;
    use transcription::{Bound, Item, ItemAddressInPage, MarkType, PageTranscription, TextBox};

    fn builder() -> WitnessBuilder {
        WitnessBuilder::new(&WitnessConfig::default()).expect("default config")
    }

    fn texts(tokens: &[TranscriptionToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text()).collect()
    }

    fn single_page(items: Vec<Item>) -> DocumentTranscription {
        DocumentTranscription::new("1").with_page(1, PageTranscription::from_column_items(vec![items]))
    }

    #[test]
    fn words_join_across_items() {
        let doc = DocumentTranscription::new("1").with_page(
            1,
            PageTranscription::from_column_texts("la", 0, &[&["some", "text", ".", "more", "text andmore"]]),
        );
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(
            texts(&witness.tokens),
            vec!["sometext", ".", "moretext", " ", "andmore"]
        );
        assert_eq!(witness.tokens[0].source_item_indexes, vec![0, 1]);
        assert_eq!(witness.tokens[2].source_item_indexes, vec![3, 4]);
        assert_eq!(witness.tokens[4].source_item_indexes, vec![4]);
        assert_eq!(witness.tokens[4].source_item_char_ranges, vec![IntRange::new(5, 7)]);
        assert!(witness.non_token_item_indexes.iter().all(NonTokenItemIndexes::is_empty));
    }

    #[test]
    fn marks_and_no_word_break() {
        let doc = single_page(vec![
            Item::mark(MarkType::Note),
            Item::text("Text"),
            Item::mark(MarkType::Note),
            Item::text("more te"),
            Item::no_word_break(),
            Item::text("\nxt"),
            Item::mark(MarkType::Note),
        ]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        let tokens = &witness.tokens;
        assert_eq!(texts(tokens), vec!["Text", "more", " ", "text"]);

        let indexes: Vec<Vec<usize>> = tokens.iter().map(|t| t.source_item_indexes.clone()).collect();
        assert_eq!(indexes, vec![vec![1], vec![3], vec![3], vec![3, 4, 5]]);

        assert_eq!(tokens[0].source_item_char_ranges, vec![IntRange::new(0, 4)]);
        assert_eq!(tokens[2].source_item_char_ranges, vec![IntRange::new(4, 1)]);
        assert_eq!(
            tokens[3].source_item_char_ranges,
            vec![IntRange::new(5, 2), IntRange::new(0, 0), IntRange::new(0, 3)]
        );

        for t in &tokens[..3] {
            assert_eq!(t.text_box_line_range, TextBoxLineRange::new(0, 1, 1));
        }
        assert_eq!(tokens[3].text_box_line_range, TextBoxLineRange::new(0, 1, 2));

        let non_token = &witness.non_token_item_indexes;
        assert_eq!(non_token[0], NonTokenItemIndexes { pre: vec![0], post: vec![2] });
        assert!(non_token[1].is_empty());
        assert!(non_token[2].is_empty());
        assert_eq!(non_token[3], NonTokenItemIndexes { pre: vec![], post: vec![6] });
    }

    #[test]
    fn newline_kept_without_swallowing() {
        let cfg = WitnessConfig {
            swallow_newline_after_no_word_break: false,
            ..WitnessConfig::default()
        };
        let doc = single_page(vec![Item::text("te"), Item::no_word_break(), Item::text("\nxt")]);
        let witness = WitnessBuilder::new(&cfg)
            .expect("config")
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["te", "\n", "xt"]);
        assert_eq!(witness.tokens[0].source_item_indexes, vec![0, 1]);
    }

    #[test]
    fn no_word_break_without_open_word_is_a_non_token_item() {
        let doc = single_page(vec![Item::no_word_break(), Item::text("a "), Item::no_word_break()]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["a", " "]);
        assert_eq!(witness.non_token_item_indexes[0].pre, vec![0]);
        assert_eq!(witness.non_token_item_indexes[1].post, vec![2]);
    }

    #[test]
    fn gap_closes_word() {
        let doc = single_page(vec![Item::text("ver"), Item::gap(3), Item::text("bum")]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["ver", "bum"]);
        assert_eq!(witness.non_token_item_indexes[0].post, vec![1]);
    }

    #[test]
    fn text_box_change_closes_word_but_page_change_does_not() {
        let mut first = PageTranscription::from_column_texts("la", 0, &[&["in", "prin"]]);
        first.add_text_box(
            TextBox::marginal_addition("margin", ItemAddressInPage::new(0, 0))
                .with_items([Item::text("cipio").with_language("la")]),
        );
        let second = PageTranscription::from_column_texts("la", 0, &[&["cipio"]]);
        let doc = DocumentTranscription::new("7").with_page(1, first).with_page(2, second);

        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        // reading order: "in" (0,0), "cipio" (1,0), "prin" (0,1), "cipio" page 2
        assert_eq!(texts(&witness.tokens), vec!["in", "cipio", "principio"]);
        assert_eq!(witness.tokens[2].source_item_indexes, vec![2, 3]);
        assert_eq!(
            witness.tokens[2].source_item_addresses,
            vec![ItemAddressInDocument::new(1, 0, 1), ItemAddressInDocument::new(2, 0, 0)]
        );
    }

    #[test]
    fn line_numbers_continue_within_a_box() {
        let doc = single_page(vec![Item::text("a\nb\n"), Item::text("c")]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        let last = witness.tokens.last().expect("tokens");
        assert_eq!(last.text(), "c");
        assert_eq!(last.text_box_line_range, TextBoxLineRange::new(0, 3, 3));
    }

    #[test]
    fn normalized_text_is_tokenized_by_default() {
        let doc = single_page(vec![Item::text("dns").with_normalization("dominus", "abbreviation")]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["dominus"]);

        let cfg = WitnessConfig::default().with_normalized_text(false);
        let witness = build_witness(&doc, "AW1", 1, Bound::Start, Bound::End, &cfg).expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["dns"]);
    }

    #[test]
    fn only_marks_give_no_tokens() {
        let doc = single_page(vec![Item::mark(MarkType::ParagraphMark)]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert!(witness.tokens.is_empty());
        assert!(witness.non_token_item_indexes.is_empty());
        assert_eq!(witness.unattached_item_indexes, vec![0]);

        let doc = single_page(vec![Item::mark(MarkType::Note), Item::text(""), Item::gap(2)]);
        let items = doc.get_item_range(Bound::Start, Bound::End).expect("range");
        let run = builder().tokenize_items(&items);
        assert!(run.tokens.is_empty());
        assert_eq!(run.unattached_item_indexes, vec![0, 1, 2]);
    }

    #[test]
    fn empty_text_item_stays_inside_the_open_word() {
        let doc = single_page(vec![Item::text("ver"), Item::text(""), Item::text("bum")]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["verbum"]);
        assert_eq!(witness.tokens[0].source_item_indexes, vec![0, 1, 2]);
        assert_eq!(
            witness.tokens[0].source_item_char_ranges,
            vec![IntRange::new(0, 3), IntRange::new(0, 0), IntRange::new(0, 3)]
        );
        assert!(witness.non_token_item_indexes[0].is_empty());
    }

    #[test]
    fn empty_text_item_without_open_word_is_a_non_token_item() {
        let doc = single_page(vec![Item::text(""), Item::text("a "), Item::text(""), Item::text("b")]);
        let witness = builder()
            .build(&doc, "AW1", 1, Bound::Start, Bound::End)
            .expect("witness");
        assert_eq!(texts(&witness.tokens), vec!["a", " ", "b"]);
        assert_eq!(witness.non_token_item_indexes[0].pre, vec![0]);
        assert_eq!(witness.non_token_item_indexes[1].post, vec![2]);
    }

    #[test]
    fn normalizers_apply_to_joined_words() {
        let cfg = WitnessConfig::default()
            .with_normalizers([NormalizerKind::UnicodeNfc, NormalizerKind::Lowercase]);
        let doc = single_page(vec![Item::text("VERBV"), Item::text("M Cafe\u{0301}.")]);
        let witness = build_witness(&doc, "AW1", 1, Bound::Start, Bound::End, &cfg).expect("witness");
        let norms: Vec<&str> = witness.tokens.iter().map(|t| t.normalization()).collect();
        assert_eq!(norms, vec!["verbvm", " ", "caf\u{00E9}", "."]);
        assert_eq!(witness.tokens[0].text(), "VERBVM");
    }

    #[test]
    fn bad_bounds_fail() {
        let doc = single_page(vec![Item::text("a")]);
        let res = builder().build(
            &doc,
            "AW1",
            1,
            Bound::At(ItemAddressInDocument::new(5, 0, 0)),
            Bound::End,
        );
        assert!(matches!(res, Err(WitnessError::Transcription(_))));
    }
}
