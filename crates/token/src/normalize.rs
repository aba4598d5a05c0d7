//! Token normalizers.
//!
//! A normalizer rewrites the `normalization` field of word tokens so that
//! spelling variants compare equal during collation. The source `text` is
//! never touched, and non-word tokens pass through unchanged.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::token::{Token, TokenType};

pub trait TokenNormalizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the new normalization for `current`.
    fn normalize(&self, current: &str) -> String;
}

/// Unicode lowercasing, independent of locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl TokenNormalizer for Lowercase {
    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn normalize(&self, current: &str) -> String {
        current.to_lowercase()
    }
}

/// Canonical composition, so precomposed and combining forms compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeNfc;

impl TokenNormalizer for UnicodeNfc {
    fn name(&self) -> &'static str {
        "unicode_nfc"
    }

    fn normalize(&self, current: &str) -> String {
        current.nfc().collect()
    }
}

/// Built-in normalizers by name, for configuration files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    Lowercase,
    UnicodeNfc,
}

impl NormalizerKind {
    pub fn normalizer(self) -> Box<dyn TokenNormalizer> {
        match self {
            NormalizerKind::Lowercase => Box::new(Lowercase),
            NormalizerKind::UnicodeNfc => Box::new(UnicodeNfc),
        }
    }
}

/// Runs normalizers in order, each on the previous one's output.
#[derive(Default)]
pub struct NormalizerChain {
    normalizers: Vec<Box<dyn TokenNormalizer>>,
}

impl NormalizerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, normalizer: impl TokenNormalizer + 'static) -> Self {
        self.normalizers.push(Box::new(normalizer));
        self
    }

    /// Chain of the built-in normalizers, in the given order.
    pub fn from_kinds(kinds: &[NormalizerKind]) -> Self {
        Self {
            normalizers: kinds.iter().map(|kind| kind.normalizer()).collect(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.normalizers.iter().map(|n| n.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.normalizers.is_empty()
    }
}

impl std::fmt::Debug for NormalizerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizerChain")
            .field("normalizers", &self.names())
            .finish()
    }
}

impl TokenNormalizer for NormalizerChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn normalize(&self, current: &str) -> String {
        self.normalizers
            .iter()
            .fold(current.to_string(), |acc, n| n.normalize(&acc))
    }
}

/// Applies `normalizer` to every word token in place.
pub fn normalize_tokens<T: AsMut<Token>>(tokens: &mut [T], normalizer: &dyn TokenNormalizer) {
    for token in tokens.iter_mut() {
        let token: &mut Token = token.as_mut();
        if token.token_type == TokenType::Word {
            token.normalization = normalizer.normalize(&token.normalization);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn lowercase_only_touches_words() {
        let mut tokens = tokenize("Deus EST.", "la");
        normalize_tokens(&mut tokens, &Lowercase);
        let norms: Vec<&str> = tokens.iter().map(|t| t.normalization.as_str()).collect();
        assert_eq!(norms, vec!["deus", " ", "est", "."]);
        assert_eq!(tokens[0].text, "Deus");
    }

    #[test]
    fn chain_applies_in_order() {
        let chain = NormalizerChain::new().with(UnicodeNfc).with(Lowercase);
        assert_eq!(chain.names(), vec!["unicode_nfc", "lowercase"]);
        assert_eq!(chain.normalize("CAFE\u{0301}"), "caf\u{00E9}");
    }

    #[test]
    fn equivalent_after_normalization() {
        let mut a = tokenize("Caf\u{00E9}", "");
        let mut b = tokenize("cafe\u{0301}", "");
        let chain = NormalizerChain::new().with(UnicodeNfc).with(Lowercase);
        normalize_tokens(&mut a, &chain);
        normalize_tokens(&mut b, &chain);
        assert!(a[0].is_equivalent(&b[0]));
        assert_ne!(a[0].text, b[0].text);
    }

    #[test]
    fn kinds_read_from_config_names() {
        let kinds: Vec<NormalizerKind> =
            serde_json::from_str(r#"["unicode_nfc", "lowercase"]"#).expect("kinds");
        let chain = NormalizerChain::from_kinds(&kinds);
        assert_eq!(chain.names(), vec!["unicode_nfc", "lowercase"]);
        assert_eq!(chain.normalize("E\u{0301}T"), "\u{00E9}t");
    }

    #[test]
    fn empty_chain_is_identity() {
        let chain = NormalizerChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.normalize("Abc"), "Abc");
    }
}
