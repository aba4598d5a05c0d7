use std::sync::OnceLock;

use crate::config::TokenizerConfig;
use crate::error::TokenizerConfigError;
use crate::numeral::is_numbering_label;
use crate::punctuation::{is_inside_word, PunctuationTable};
use crate::token::{IntRange, LineRange, Token, TokenType};

/// Splits flat strings into word, whitespace, punctuation and numbering-label
/// tokens.
///
/// The tokenizer is total: every input produces tokens whose texts
/// concatenate back to the input. Character ranges are counted in `char`s and
/// lines start at 1.
#[derive(Debug, Clone)]
pub struct StringTokenizer {
    table: PunctuationTable,
    detect_numbering_labels: bool,
    default_language: String,
}

impl Default for StringTokenizer {
    fn default() -> Self {
        Self {
            table: PunctuationTable::builtin(),
            detect_numbering_labels: true,
            default_language: String::new(),
        }
    }
}

impl StringTokenizer {
    pub fn new(cfg: &TokenizerConfig) -> Result<Self, TokenizerConfigError> {
        Ok(Self {
            table: cfg.punctuation_table()?,
            detect_numbering_labels: cfg.detect_numbering_labels,
            default_language: cfg.default_language.clone(),
        })
    }

    pub fn table(&self) -> &PunctuationTable {
        &self.table
    }

    pub fn tokenize(&self, text: &str, lang: &str) -> Vec<Token> {
        let lang = if lang.is_empty() {
            self.default_language.as_str()
        } else {
            lang
        };

        let mut tokens = Vec::with_capacity(text.len() / 4 + 1);
        let mut line = 1usize;

        let mut whitespace = String::new();
        let mut whitespace_start = 0usize;
        let mut whitespace_line = 1usize;

        let mut run: Vec<char> = Vec::new();
        let mut run_start = 0usize;

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                if !run.is_empty() {
                    self.split_run(&run, run_start, line, lang, &mut tokens);
                    run.clear();
                }
                if whitespace.is_empty() {
                    whitespace_start = i;
                    whitespace_line = line;
                }
                whitespace.push(ch);
                if ch == '\n' {
                    line += 1;
                }
            } else {
                if !whitespace.is_empty() {
                    tokens.push(whitespace_token(
                        std::mem::take(&mut whitespace),
                        whitespace_start,
                        LineRange::new(whitespace_line, line),
                    ));
                }
                if run.is_empty() {
                    run_start = i;
                }
                run.push(ch);
            }
        }

        if !run.is_empty() {
            self.split_run(&run, run_start, line, lang, &mut tokens);
        }
        if !whitespace.is_empty() {
            tokens.push(whitespace_token(
                whitespace,
                whitespace_start,
                LineRange::new(whitespace_line, line),
            ));
        }
        tokens
    }

    /// Classifies one maximal run of non-whitespace characters.
    fn split_run(&self, run: &[char], start: usize, line: usize, lang: &str, out: &mut Vec<Token>) {
        let mut emit = Emitter { run, start, line, out };

        if self.table.is_all_punctuation(run, lang) {
            for i in 0..run.len() {
                emit.punctuation(i);
            }
            return;
        }
        if self.detect_numbering_labels {
            let text: String = run.iter().collect();
            if is_numbering_label(&text) {
                emit.push(TokenType::NumberingLabel, 0, run.len());
                return;
            }
        }
        if self.table.has_punctuation(run, lang) {
            self.split_mixed_run(&mut emit, lang);
        } else {
            emit.push(TokenType::Word, 0, run.len());
        }
    }

    /// Period-aware splitting of a run that mixes word characters and
    /// punctuation. A single period between word characters stays in the
    /// word; two or more consecutive periods become one token each.
    fn split_mixed_run(&self, emit: &mut Emitter<'_>, lang: &str) {
        let len = emit.run.len();
        let mut state = MixedState::Start;
        let mut word_start = 0usize;
        let mut word_len = 0usize;
        let mut periods_start = 0usize;
        let mut n_periods = 0usize;

        for i in 0..len {
            let ch = emit.run[i];
            let is_period = ch == '.';
            let is_punct = !is_period && self.table.is_punctuation(ch, lang, is_inside_word(i, len));

            state = match state {
                MixedState::Start => {
                    if is_period {
                        periods_start = i;
                        n_periods = 1;
                        MixedState::Periods
                    } else if is_punct {
                        emit.punctuation(i);
                        MixedState::Start
                    } else {
                        word_start = i;
                        word_len = 1;
                        MixedState::Word
                    }
                }
                MixedState::Word => {
                    if is_period {
                        MixedState::PeriodInsideWord
                    } else if is_punct {
                        emit.push(TokenType::Word, word_start, word_len);
                        emit.punctuation(i);
                        MixedState::Start
                    } else {
                        word_len += 1;
                        MixedState::Word
                    }
                }
                MixedState::Periods => {
                    if is_period {
                        n_periods += 1;
                        MixedState::Periods
                    } else {
                        emit.periods(periods_start, n_periods);
                        if is_punct {
                            emit.punctuation(i);
                            MixedState::Start
                        } else {
                            word_start = i;
                            word_len = 1;
                            MixedState::Word
                        }
                    }
                }
                MixedState::PeriodInsideWord => {
                    if is_period {
                        emit.push(TokenType::Word, word_start, word_len);
                        periods_start = i - 1;
                        n_periods = 2;
                        MixedState::Periods
                    } else if is_punct {
                        emit.push(TokenType::Word, word_start, word_len);
                        emit.punctuation(i - 1);
                        emit.punctuation(i);
                        MixedState::Start
                    } else {
                        word_len += 2;
                        MixedState::Word
                    }
                }
            };
        }

        match state {
            MixedState::Start => {}
            MixedState::Word => emit.push(TokenType::Word, word_start, word_len),
            MixedState::Periods => emit.periods(periods_start, n_periods),
            MixedState::PeriodInsideWord => {
                emit.push(TokenType::Word, word_start, word_len);
                emit.punctuation(len - 1);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MixedState {
    Start,
    Word,
    Periods,
    PeriodInsideWord,
}

/// Pushes tokens for slices of one run, computing absolute char ranges.
struct Emitter<'a> {
    run: &'a [char],
    start: usize,
    line: usize,
    out: &'a mut Vec<Token>,
}

impl Emitter<'_> {
    fn push(&mut self, token_type: TokenType, offset: usize, len: usize) {
        let text: String = self.run[offset..offset + len].iter().collect();
        self.out.push(
            Token::new(token_type, text)
                .with_char_range(IntRange::new(self.start + offset, len))
                .with_line_range(LineRange::single(self.line)),
        );
    }

    fn punctuation(&mut self, offset: usize) {
        self.push(TokenType::Punctuation, offset, 1);
    }

    fn periods(&mut self, offset: usize, count: usize) {
        for j in 0..count {
            self.punctuation(offset + j);
        }
    }
}

fn whitespace_token(text: String, start: usize, lines: LineRange) -> Token {
    let len = text.chars().count();
    Token::whitespace(text)
        .with_char_range(IntRange::new(start, len))
        .with_line_range(lines)
}

fn default_tokenizer() -> &'static StringTokenizer {
    static DEFAULT: OnceLock<StringTokenizer> = OnceLock::new();
    DEFAULT.get_or_init(StringTokenizer::default)
}

/// Tokenizes `text` with the built-in punctuation table.
pub fn tokenize(text: &str, lang: &str) -> Vec<Token> {
    default_tokenizer().tokenize(text, lang)
}

/// Concatenates token texts.
pub fn detokenize(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(tokens: &[Token]) -> Vec<(TokenType, &str)> {
        tokens.iter().map(|t| (t.token_type, t.text.as_str())).collect()
    }

    #[test]
    fn leading_whitespace_then_word() {
        let tokens = tokenize("   Text", "la");
        assert_eq!(
            pairs(&tokens),
            vec![(TokenType::Whitespace, "   "), (TokenType::Word, "Text")]
        );
        assert_eq!(tokens[0].line_number(), Some(1));
        assert_eq!(tokens[1].line_number(), Some(1));
        assert_eq!(tokens[1].char_range, Some(IntRange::new(3, 4)));
    }

    #[test]
    fn punctuation_run_before_word() {
        let tokens = tokenize(".;.Text", "en");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::Punctuation, "."),
                (TokenType::Punctuation, ";"),
                (TokenType::Punctuation, "."),
                (TokenType::Word, "Text"),
            ]
        );
        let starts: Vec<usize> = tokens
            .iter()
            .filter_map(|t| t.char_range.map(|r| r.start))
            .collect();
        assert_eq!(starts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn all_punctuation_run_splits_per_character() {
        let tokens = tokenize("?!", "");
        assert_eq!(
            pairs(&tokens),
            vec![(TokenType::Punctuation, "?"), (TokenType::Punctuation, "!")]
        );
    }

    #[test]
    fn abbreviation_keeps_word_and_trailing_period() {
        let tokens = tokenize("Sp.", "la");
        assert_eq!(
            pairs(&tokens),
            vec![(TokenType::Word, "Sp"), (TokenType::Punctuation, ".")]
        );
        assert_eq!(tokens[1].char_range, Some(IntRange::new(2, 1)));
    }

    #[test]
    fn single_inner_period_stays_in_word() {
        let tokens = tokenize("e.g;", "en");
        assert_eq!(
            pairs(&tokens),
            vec![(TokenType::Word, "e.g"), (TokenType::Punctuation, ";")]
        );
        assert_eq!(pairs(&tokenize("3.5", "")), vec![(TokenType::Word, "3.5")]);
    }

    #[test]
    fn ellipsis_splits_mixed_run() {
        let tokens = tokenize("word...more;", "la");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::Word, "word"),
                (TokenType::Punctuation, "."),
                (TokenType::Punctuation, "."),
                (TokenType::Punctuation, "."),
                (TokenType::Word, "more"),
                (TokenType::Punctuation, ";"),
            ]
        );
        let ranges: Vec<IntRange> = tokens.iter().filter_map(|t| t.char_range).collect();
        assert_eq!(ranges[1], IntRange::new(4, 1));
        assert_eq!(ranges[4], IntRange::new(7, 4));

        // periods alone never make a run mixed
        assert_eq!(
            pairs(&tokenize("word...more", "la")),
            vec![(TokenType::Word, "word...more")]
        );
    }

    #[test]
    fn period_before_other_punctuation() {
        let tokens = tokenize("end.;", "la");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::Word, "end"),
                (TokenType::Punctuation, "."),
                (TokenType::Punctuation, ";"),
            ]
        );
    }

    #[test]
    fn numbering_labels() {
        let tokens = tokenize("[1.2] text", "la");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::NumberingLabel, "[1.2]"),
                (TokenType::Whitespace, " "),
                (TokenType::Word, "text"),
            ]
        );

        let cfg = TokenizerConfig::default().with_numbering_labels(false);
        let tokenizer = StringTokenizer::new(&cfg).expect("valid config");
        let tokens = tokenizer.tokenize("[1]", "la");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::Punctuation, "["),
                (TokenType::Word, "1"),
                (TokenType::Punctuation, "]"),
            ]
        );
    }

    #[test]
    fn newlines_advance_line_numbers() {
        let tokens = tokenize("one\ntwo \n\nthree", "");
        assert_eq!(tokens[0].line_range, Some(LineRange::single(1)));
        assert_eq!(tokens[1].line_range, Some(LineRange::new(1, 2)));
        assert_eq!(tokens[2].line_range, Some(LineRange::single(2)));
        assert_eq!(tokens[3].line_range, Some(LineRange::new(2, 4)));
        assert_eq!(tokens[4].line_number(), Some(4));
    }

    #[test]
    fn trailing_whitespace_is_kept() {
        let tokens = tokenize("a  ", "");
        assert_eq!(
            pairs(&tokens),
            vec![(TokenType::Word, "a"), (TokenType::Whitespace, "  ")]
        );
        assert!(tokenize("", "la").is_empty());
    }

    #[test]
    fn char_ranges_count_scalar_values() {
        let tokens = tokenize("قال، ثم", "ar");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenType::Word, "قال"),
                (TokenType::Punctuation, "،"),
                (TokenType::Whitespace, " "),
                (TokenType::Word, "ثم"),
            ]
        );
        assert_eq!(tokens[1].char_range, Some(IntRange::new(3, 1)));
        assert_eq!(tokens[3].char_range, Some(IntRange::new(5, 2)));
    }

    #[test]
    fn default_language_used_for_empty_tag() {
        let cfg = TokenizerConfig::default()
            .with_default_language("la")
            .with_override(crate::PunctuationOverride::new("-").for_language("la"));
        let tokenizer = StringTokenizer::new(&cfg).expect("valid config");
        assert_eq!(tokenizer.tokenize("a-b", "").len(), 3);
        assert_eq!(tokenizer.tokenize("a-b", "en").len(), 1);
    }

    #[test]
    fn round_trip_reconstructs_input() {
        let inputs = [
            "",
            "   Text",
            ".;.Text",
            "In principio erat verbum, et verbum erat apud Deum.",
            "Sp. ... ¿qué? «x» [12.3] (a) \n\t tail  ",
            "וַיֹּאמֶר׃ אֱלֹהִים",
            "a..b.c...",
        ];
        for input in inputs {
            let tokens = tokenize(input, "la");
            assert_eq!(detokenize(&tokens), input);
            assert!(tokens.iter().all(|t| !t.text.is_empty()));
        }
    }

    #[test]
    fn retokenizing_is_stable() {
        let input = "Sp. ... ¿qué? «x» [12.3] (a)\nword...more";
        let first = tokenize(input, "la");
        let second = tokenize(&detokenize(&first), "la");
        assert_eq!(pairs(&first), pairs(&second));
    }
}
