use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use transcription::ItemInDocument;

use crate::builder::NonTokenItemIndexes;
use crate::error::WitnessIdError;
use crate::hash::hash_tokens;
use crate::id::WitnessSystemId;
use crate::transcription_token::TranscriptionToken;

/// A full-transcription witness of one chunk of a work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionWitness {
    pub work_id: String,
    pub chunk_number: u32,
    pub doc_id: String,
    /// The flattened items the tokens point into.
    pub items: Vec<ItemInDocument>,
    pub tokens: Vec<TranscriptionToken>,
    /// Parallel to `tokens`.
    pub non_token_item_indexes: Vec<NonTokenItemIndexes>,
    /// Marks, gaps and empty text items of a range that produced no token.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unattached_item_indexes: Vec<usize>,
}

impl TranscriptionWitness {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Token texts joined, i.e. the witness as read.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text()).collect()
    }

    pub fn content_hash(&self) -> String {
        hash_tokens(self.tokens.iter().map(|t| &t.token))
    }

    /// Identity of this witness for a given transcription version.
    pub fn system_id(
        &self,
        local_witness_id: &str,
        version: NaiveDateTime,
    ) -> Result<WitnessSystemId, WitnessIdError> {
        WitnessSystemId::full_tx_at(
            &self.work_id,
            self.chunk_number,
            &self.doc_id,
            local_witness_id,
            version,
        )
    }
}
