/// Digit systems recognised in numbering labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitStyle {
    Western,
    ArabicIndic,
}

impl DigitStyle {
    fn contains(self, ch: char) -> bool {
        match self {
            DigitStyle::Western => ch.is_ascii_digit(),
            DigitStyle::ArabicIndic => ('\u{0660}'..='\u{0669}').contains(&ch),
        }
    }

    /// The style of a non-empty string made only of one style's digits.
    pub fn of(s: &str) -> Option<DigitStyle> {
        let first = s.chars().next()?;
        let style = [DigitStyle::Western, DigitStyle::ArabicIndic]
            .into_iter()
            .find(|style| style.contains(first))?;
        s.chars().all(|c| style.contains(c)).then_some(style)
    }
}

/// True for bracketed section numbers such as `[1]`, `[12.3]` or `[٣]`.
///
/// The text between the brackets is split on `.`; the first field must be a
/// non-empty run of Western or Arabic-Indic digits. Later fields are not
/// inspected.
pub fn is_numbering_label(s: &str) -> bool {
    if s.chars().count() < 3 {
        return false;
    }
    let Some(inner) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return false;
    };
    let first = inner.split('.').next().unwrap_or("");
    DigitStyle::of(first).is_some()
}
