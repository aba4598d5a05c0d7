//! Language-dependent punctuation classification.
//!
//! Whether a character splits words depends on the language and on where the
//! character sits: a period or a colon at a word boundary is punctuation, but
//! inside a word it is kept (decimal points, ratios, abbreviations). The
//! classification is plain data, so callers can inject their own entries per
//! language through [`PunctuationTable::set_class`] or the tokenizer config.
//!
//! Lookups fall back from the requested language to the table's defaults. A
//! character with no entry at all is never punctuation.

use std::collections::BTreeMap;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Resolved classification of one character in one language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterClass {
    pub is_punctuation: bool,
    /// Punctuation when found strictly inside a non-whitespace run.
    pub is_punctuation_inside_word: bool,
    /// Typesetting hint: no space between this mark and the previous token.
    pub sticks_to_previous: bool,
    /// Typesetting hint: no space between this mark and the next token.
    pub sticks_to_next: bool,
}

impl CharacterClass {
    /// A mark that splits words everywhere.
    pub const fn splitting(sticks_to_previous: bool, sticks_to_next: bool) -> Self {
        Self {
            is_punctuation: true,
            is_punctuation_inside_word: true,
            sticks_to_previous,
            sticks_to_next,
        }
    }

    /// A mark that is punctuation only at word boundaries.
    pub const fn boundary_only(sticks_to_previous: bool, sticks_to_next: bool) -> Self {
        Self {
            is_punctuation: true,
            is_punctuation_inside_word: false,
            sticks_to_previous,
            sticks_to_next,
        }
    }

    pub const NOT_PUNCTUATION: CharacterClass = CharacterClass {
        is_punctuation: false,
        is_punctuation_inside_word: false,
        sticks_to_previous: false,
        sticks_to_next: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    default: CharacterClass,
    by_language: BTreeMap<String, CharacterClass>,
}

/// Punctuation classification keyed by character, with per-language
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunctuationTable {
    entries: FxHashMap<char, Entry>,
}

impl Default for PunctuationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PunctuationTable {
    /// A table with no entries: nothing is punctuation.
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// The built-in table for Latin, Arabic and Hebrew transcriptions.
    pub fn builtin() -> Self {
        use CharacterClass as C;

        let mut table = Self::empty();
        let defaults: &[(char, CharacterClass)] = &[
            // decimal period, decimal comma and ratios stay inside words
            ('.', C::boundary_only(true, false)),
            (',', C::boundary_only(true, false)),
            ('\u{060C}', C::splitting(true, false)), // Arabic comma
            (';', C::splitting(true, false)),
            ('\u{061B}', C::splitting(true, false)), // Arabic semicolon
            (':', C::boundary_only(true, false)),
            ('¿', C::splitting(false, true)),
            ('?', C::splitting(true, false)),
            ('\u{061F}', C::splitting(true, false)), // Arabic question mark
            ('¡', C::splitting(false, true)),
            ('!', C::splitting(true, false)),
            ('⊙', C::splitting(false, false)),
            ('¶', C::splitting(false, false)),
            ('\u{2013}', C::splitting(false, false)), // en dash
            ('\u{2014}', C::splitting(false, false)), // em dash
            ('\u{2E3A}', C::splitting(false, false)), // two-em dash
            ('«', C::splitting(false, true)),
            ('»', C::splitting(true, false)),
            ('[', C::boundary_only(false, true)),
            (']', C::boundary_only(true, false)),
            ('(', C::boundary_only(false, true)),
            (')', C::boundary_only(true, false)),
            ('{', C::boundary_only(false, true)),
            ('}', C::boundary_only(true, false)),
            ('⟨', C::boundary_only(false, true)),
            ('⟩', C::boundary_only(true, false)),
            // editors must use curly quotes; straight ones are word characters
            ('"', C::NOT_PUNCTUATION),
            ('\'', C::NOT_PUNCTUATION),
            ('“', C::splitting(false, true)),
            ('”', C::splitting(true, false)),
            ('‘', C::boundary_only(false, true)),
            ('’', C::boundary_only(true, false)),
            ('\u{060D}', C::splitting(false, false)), // Arabic date separator
            ('\u{05BE}', C::splitting(false, false)), // Hebrew maqaf
            ('\u{05C0}', C::splitting(false, false)), // Hebrew paseq
            ('\u{05C3}', C::splitting(false, false)), // Hebrew soft pasuq
        ];
        for (ch, class) in defaults {
            table.set_default(*ch, *class);
        }

        // Quotation marks point the other way in right-to-left scripts.
        for lang in ["ar", "he"] {
            table.set_class('“', Some(lang), C::splitting(true, false));
            table.set_class('”', Some(lang), C::splitting(false, true));
            table.set_class('‘', Some(lang), C::splitting(true, false));
            table.set_class('’', Some(lang), C::boundary_only(false, true));
        }
        table
    }

    fn set_default(&mut self, ch: char, class: CharacterClass) {
        self.set_class(ch, None, class);
    }

    /// Sets the classification of `ch`, either as the default (`lang =
    /// None`) or for one language only.
    pub fn set_class(&mut self, ch: char, lang: Option<&str>, class: CharacterClass) {
        match lang {
            None | Some("") => {
                self.entries
                    .entry(ch)
                    .and_modify(|e| e.default = class)
                    .or_insert_with(|| Entry {
                        default: class,
                        by_language: BTreeMap::new(),
                    });
            }
            Some(lang) => {
                self.entries
                    .entry(ch)
                    .or_insert_with(|| Entry {
                        default: CharacterClass::NOT_PUNCTUATION,
                        by_language: BTreeMap::new(),
                    })
                    .by_language
                    .insert(lang.to_string(), class);
            }
        }
    }

    pub fn class_of(&self, ch: char, lang: &str) -> Option<&CharacterClass> {
        let entry = self.entries.get(&ch)?;
        Some(entry.by_language.get(lang).unwrap_or(&entry.default))
    }

    pub fn is_punctuation(&self, ch: char, lang: &str, inside_word: bool) -> bool {
        match self.class_of(ch, lang) {
            Some(class) if inside_word => class.is_punctuation_inside_word,
            Some(class) => class.is_punctuation,
            None => false,
        }
    }

    pub fn sticks_to_previous(&self, ch: char, lang: &str) -> bool {
        self.class_of(ch, lang)
            .map(|c| c.sticks_to_previous)
            .unwrap_or(false)
    }

    pub fn sticks_to_next(&self, ch: char, lang: &str) -> bool {
        self.class_of(ch, lang)
            .map(|c| c.sticks_to_next)
            .unwrap_or(false)
    }

    /// True if every character is punctuation at a word boundary.
    pub fn is_all_punctuation(&self, chars: &[char], lang: &str) -> bool {
        chars.iter().all(|&c| self.is_punctuation(c, lang, false))
    }

    /// True if at least one character is punctuation at its position in the
    /// run.
    pub fn has_punctuation(&self, chars: &[char], lang: &str) -> bool {
        let len = chars.len();
        chars
            .iter()
            .enumerate()
            .any(|(i, &c)| self.is_punctuation(c, lang, is_inside_word(i, len)))
    }
}

/// Position `i` of a run of length `len` is inside the word when it is
/// neither the first nor the last character.
pub(crate) fn is_inside_word(i: usize, len: usize) -> bool {
    i > 0 && i + 1 < len
}
