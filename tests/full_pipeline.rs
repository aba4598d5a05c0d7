//! End-to-end collation over small manuscripts.

use std::collections::BTreeSet;

use collatio::{
    apply_edit_script, collate_documents, edit_distance, CollatioConfig, DocumentTranscription,
    EditCommand, Item, ItemAddressInPage, MarkType, PageTranscription, TextBox,
    TranscriptionWitness, WitnessRequest,
};

fn single_column(doc_id: &str, items: Vec<Item>) -> DocumentTranscription {
    DocumentTranscription::new(doc_id).with_page(1, PageTranscription::from_column_items(vec![items]))
}

fn texts(witness: &TranscriptionWitness) -> Vec<&str> {
    witness.tokens.iter().map(|t| t.text()).collect()
}

/// Every item is claimed by exactly one token or one non-token slot.
fn assert_full_coverage(witness: &TranscriptionWitness) {
    let mut seen = BTreeSet::new();
    for token in &witness.tokens {
        assert!(!token.source_item_indexes.is_empty());
        for pair in token.source_item_indexes.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "indexes must be contiguous");
        }
        for &i in &token.source_item_indexes {
            assert!(seen.insert(i), "item {i} claimed twice");
        }
    }
    for slot in &witness.non_token_item_indexes {
        for &i in slot.pre.iter().chain(&slot.post) {
            assert!(seen.insert(i), "item {i} claimed twice");
        }
    }
    let all: BTreeSet<usize> = (0..witness.items.len()).collect();
    assert_eq!(seen, all);
}

#[test]
fn words_are_joined_across_items() {
    let doc = DocumentTranscription::new("W").with_page(
        1,
        PageTranscription::from_column_texts("la", 0, &[&["some", "text", ".", "more", "text andmore"]]),
    );
    let input = collate_documents(
        &[WitnessRequest::whole_document(&doc, "AW1", 1)],
        &CollatioConfig::default(),
    )
    .expect("collation");

    let witness = &input.witnesses[0];
    assert_eq!(texts(witness), vec!["sometext", ".", "moretext", " ", "andmore"]);
    assert_eq!(witness.tokens[0].source_item_indexes, vec![0, 1]);
    assert_eq!(witness.tokens[2].source_item_indexes, vec![3, 4]);
    assert!(input.edit_scripts.is_empty());
    assert_full_coverage(witness);
}

#[test]
fn marks_attach_to_neighbouring_tokens() {
    let doc = single_column(
        "M",
        vec![
            Item::mark(MarkType::Note),
            Item::text("Text"),
            Item::mark(MarkType::Note),
            Item::text("more te"),
            Item::no_word_break(),
            Item::text("\nxt"),
            Item::mark(MarkType::Note),
        ],
    );
    let input = collate_documents(
        &[WitnessRequest::whole_document(&doc, "AW1", 1)],
        &CollatioConfig::default(),
    )
    .expect("collation");

    let witness = &input.witnesses[0];
    assert_eq!(witness.token_count(), 4);
    assert_eq!(witness.non_token_item_indexes[0].pre, vec![0]);
    assert_eq!(witness.non_token_item_indexes[3].post, vec![6]);
    assert_full_coverage(witness);
}

#[test]
fn marginal_additions_are_read_in_place() {
    let mut page = PageTranscription::from_column_texts("la", 0, &[&["in principio ", "erat verbum"]]);
    page.add_text_box(
        TextBox::marginal_addition("margin left", ItemAddressInPage::new(0, 0))
            .with_items([Item::text(" et").with_language("la")]),
    );
    let doc = DocumentTranscription::new("A").with_page(1, page);
    let input = collate_documents(
        &[WitnessRequest::whole_document(&doc, "AW1", 1)],
        &CollatioConfig::default(),
    )
    .expect("collation");

    let witness = &input.witnesses[0];
    assert_eq!(witness.text(), "in principio  eterat verbum");
    assert_full_coverage(witness);
}

#[test]
fn variants_between_witnesses_replay() {
    let a = single_column(
        "A",
        vec![Item::text("Et verbum caro factum est, et habitavit in nobis.").with_language("la")],
    );
    let b = single_column(
        "B",
        vec![
            Item::text("Et uerbum caro fac").with_language("la"),
            Item::no_word_break(),
            Item::text("\ntum est et habitauit in nobis").with_language("la"),
        ],
    );
    let requests = [
        WitnessRequest::whole_document(&a, "AW7", 2),
        WitnessRequest::whole_document(&b, "AW7", 2),
    ];
    let input = collate_documents(&requests, &CollatioConfig::default()).expect("collation");

    let (base, other) = (&input.witnesses[0], &input.witnesses[1]);
    let script = input.script_for(1).expect("script");
    assert!(texts(other).contains(&"factum"));

    // keep + insert rebuilds the other witness token by token
    let base_tokens: Vec<_> = base.tokens.iter().map(|t| t.token.clone()).collect();
    let other_tokens: Vec<_> = other.tokens.iter().map(|t| t.token.clone()).collect();
    let rebuilt = apply_edit_script(&base_tokens, &other_tokens, script).expect("valid script");
    assert_eq!(rebuilt.len(), other_tokens.len());
    for (x, y) in rebuilt.iter().zip(&other_tokens) {
        assert!(x.is_equivalent(y));
    }

    // verbum/uerbum, the comma, habitavit/habitauit, the final period
    let changed: Vec<&str> = script
        .iter()
        .filter(|op| op.command == EditCommand::Delete)
        .map(|op| base.tokens[op.index].text())
        .collect();
    assert_eq!(changed, vec!["verbum", ",", "habitavit", "."]);
    assert_eq!(edit_distance(script), 6);
    assert_full_coverage(base);
    assert_full_coverage(other);
}

#[test]
fn collation_input_serializes_for_the_table_assembler() {
    let a = single_column("A", vec![Item::text("a b")]);
    let b = single_column("B", vec![Item::text("a c")]);
    let requests = [
        WitnessRequest::whole_document(&a, "AW1", 1),
        WitnessRequest::whole_document(&b, "AW1", 1),
    ];
    let input = collate_documents(&requests, &CollatioConfig::default()).expect("collation");
    let json = serde_json::to_value(&input).expect("serialize");

    assert_eq!(json["witnesses"][1]["docId"], "B");
    assert_eq!(json["witnesses"][0]["tokens"][2]["sourceItemIndexes"][0], 0);
    let script = json["editScripts"][0].as_array().expect("script");
    let deleted = script
        .iter()
        .find(|op| op["command"] == "delete")
        .expect("a delete");
    assert_eq!(deleted["seq"], -1);
    assert_eq!(deleted["index"], 2);
}
