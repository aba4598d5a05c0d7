use std::env;
use std::error::Error;

use collatio::{
    collate_documents, CollatioConfig, DocumentTranscription, EditCommand, Item,
    PageTranscription, WitnessRequest,
};
use tracing_subscriber::EnvFilter;

fn sample(doc_id: &str, columns: &[Vec<Item>]) -> DocumentTranscription {
    DocumentTranscription::new(doc_id).with_page(1, PageTranscription::from_column_items(columns.to_vec()))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = match env::args().nth(1) {
        Some(path) => CollatioConfig::from_file(path)?,
        None => CollatioConfig::default(),
    };

    let a = sample(
        "A",
        &[vec![
            Item::text("In principio erat uer").with_language("la"),
            Item::no_word_break(),
            Item::text("\nbum, et uerbum erat apud Deum.").with_language("la"),
        ]],
    );
    let b = sample(
        "B",
        &[vec![
            Item::text("In principio erat verbum et verbum erat apud Deum.").with_language("la"),
        ]],
    );

    let requests = [
        WitnessRequest::whole_document(&a, "AW1", 1),
        WitnessRequest::whole_document(&b, "AW1", 1),
    ];
    let input = collate_documents(&requests, &cfg)?;

    let (Some(base), Some(other), Some(script)) =
        (input.witnesses.first(), input.witnesses.get(1), input.script_for(1))
    else {
        return Ok(());
    };
    println!("{} -> {}", base.doc_id, other.doc_id);
    for op in script {
        let (mark, text) = match op.command {
            EditCommand::Keep => (' ', base.tokens[op.index].text()),
            EditCommand::Delete => ('-', base.tokens[op.index].text()),
            EditCommand::Insert => ('+', other.tokens[op.index].text()),
        };
        println!("{mark} {text:?}");
    }

    Ok(())
}
