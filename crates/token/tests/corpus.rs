use token::{tokenize, StringTokenizer, TokenizerConfig};

struct Case {
    name: &'static str,
    input: &'static str,
    lang: &'static str,
    expected_tokens: &'static [(&'static str, &'static str, usize, usize)],
}

#[test]
fn golden_corpus_regression() {
    let cases = [
        Case {
            name: "whitespace_then_word",
            input: "   Text",
            lang: "la",
            expected_tokens: &[("whitespace", "   ", 0, 3), ("word", "Text", 3, 4)],
        },
        Case {
            name: "punctuation_before_word",
            input: ".;.Text",
            lang: "en",
            expected_tokens: &[
                ("punctuation", ".", 0, 1),
                ("punctuation", ";", 1, 1),
                ("punctuation", ".", 2, 1),
                ("word", "Text", 3, 4),
            ],
        },
        Case {
            name: "abbreviations",
            input: "Sp. nov.",
            lang: "la",
            expected_tokens: &[
                ("word", "Sp", 0, 2),
                ("punctuation", ".", 2, 1),
                ("whitespace", " ", 3, 1),
                ("word", "nov", 4, 3),
                ("punctuation", ".", 7, 1),
            ],
        },
        Case {
            name: "decimal_and_ratio",
            input: "3.5 2:1",
            lang: "",
            expected_tokens: &[
                ("word", "3.5", 0, 3),
                ("whitespace", " ", 3, 1),
                ("word", "2:1", 4, 3),
            ],
        },
        Case {
            // an opening bracket inside a word is a word character
            name: "closing_bracket_split",
            input: "Roma[m]",
            lang: "la",
            expected_tokens: &[("word", "Roma[m", 0, 6), ("punctuation", "]", 6, 1)],
        },
        Case {
            name: "arabic_indic_numbering_label",
            input: "[\u{0661}\u{0662}] \u{0642}\u{0627}\u{0644}",
            lang: "ar",
            expected_tokens: &[
                ("numbering_label", "[\u{0661}\u{0662}]", 0, 4),
                ("whitespace", " ", 4, 1),
                ("word", "\u{0642}\u{0627}\u{0644}", 5, 3),
            ],
        },
        Case {
            name: "inverted_question_mark",
            input: "\u{00BF}Qu\u{00E9}?",
            lang: "es",
            expected_tokens: &[
                ("punctuation", "\u{00BF}", 0, 1),
                ("word", "Qu\u{00E9}", 1, 3),
                ("punctuation", "?", 4, 1),
            ],
        },
        Case {
            // the trailing comma makes the run mixed; "a...b" alone is one word
            name: "ellipsis_between_words",
            input: "a...b,",
            lang: "la",
            expected_tokens: &[
                ("word", "a", 0, 1),
                ("punctuation", ".", 1, 1),
                ("punctuation", ".", 2, 1),
                ("punctuation", ".", 3, 1),
                ("word", "b", 4, 1),
                ("punctuation", ",", 5, 1),
            ],
        },
    ];

    let configured = StringTokenizer::new(&TokenizerConfig::default()).expect("tokenizer");

    for case in cases {
        let tokens = tokenize(case.input, case.lang);

        let got: Vec<(String, String, usize, usize)> = tokens
            .iter()
            .map(|t| {
                let range = t
                    .char_range
                    .unwrap_or_else(|| panic!("missing char range in {}", case.name));
                (
                    t.token_type.as_str().to_string(),
                    t.text.clone(),
                    range.start,
                    range.length,
                )
            })
            .collect();
        let expected: Vec<(String, String, usize, usize)> = case
            .expected_tokens
            .iter()
            .map(|(ty, text, s, l)| (ty.to_string(), text.to_string(), *s, *l))
            .collect();
        assert_eq!(got, expected, "tokens mismatch for {}", case.name);

        assert_eq!(
            configured.tokenize(case.input, case.lang),
            tokens,
            "configured tokenizer diverges for {}",
            case.name
        );
    }
}
