use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WitnessIdError;

const FULL_TX_MARKER: &str = "-fullTx-";

/// Format of transcription version timestamps before compaction.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Stable identity of a full-transcription witness:
///
/// ```text
/// {workId}-{chunkNumber}-fullTx-{docId}-{localWitnessId}-{compactTimestamp}
/// ```
///
/// `localWitnessId` and the timestamp never contain `-`; the work id and the
/// doc id may, as long as the work id does not contain `-fullTx-`. Ids that
/// break these rules are rejected when built, so every id reads back with
/// [`parse`](WitnessSystemId::parse).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct WitnessSystemId {
    pub work_id: String,
    pub chunk_number: u32,
    pub doc_id: String,
    pub local_witness_id: String,
    /// Already compacted.
    pub timestamp: String,
}

impl WitnessSystemId {
    /// Builds an id from a timestamp string in any separator style.
    pub fn full_tx(
        work_id: &str,
        chunk_number: u32,
        doc_id: &str,
        local_witness_id: &str,
        timestamp: &str,
    ) -> Result<Self, WitnessIdError> {
        let invalid = |field, value: &str| WitnessIdError::InvalidField {
            field,
            value: value.to_string(),
        };
        if work_id.is_empty() || work_id.contains(FULL_TX_MARKER) {
            return Err(invalid("work id", work_id));
        }
        if doc_id.is_empty() {
            return Err(invalid("doc id", doc_id));
        }
        if local_witness_id.is_empty() || local_witness_id.contains('-') {
            return Err(invalid("local witness id", local_witness_id));
        }
        let timestamp = compact_timestamp(timestamp);
        if timestamp.is_empty() {
            return Err(invalid("timestamp", &timestamp));
        }

        Ok(Self {
            work_id: work_id.to_string(),
            chunk_number,
            doc_id: doc_id.to_string(),
            local_witness_id: local_witness_id.to_string(),
            timestamp,
        })
    }

    pub fn full_tx_at(
        work_id: &str,
        chunk_number: u32,
        doc_id: &str,
        local_witness_id: &str,
        version: NaiveDateTime,
    ) -> Result<Self, WitnessIdError> {
        Self::full_tx(
            work_id,
            chunk_number,
            doc_id,
            local_witness_id,
            &canonical_timestamp(version),
        )
    }

    pub fn parse(id: &str) -> Result<Self, WitnessIdError> {
        let (head, tail) = id
            .split_once(FULL_TX_MARKER)
            .ok_or_else(|| WitnessIdError::NotFullTranscription(id.to_string()))?;

        let missing = |field| WitnessIdError::MissingField {
            id: id.to_string(),
            field,
        };

        let (work_id, chunk) = head.rsplit_once('-').ok_or_else(|| missing("chunk number"))?;
        if work_id.is_empty() {
            return Err(missing("work id"));
        }
        let chunk_number = chunk.parse::<u32>().map_err(|_| WitnessIdError::InvalidNumber {
            id: id.to_string(),
            field: "chunk number",
            value: chunk.to_string(),
        })?;

        let mut parts = tail.rsplitn(3, '-');
        let timestamp = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| missing("timestamp"))?;
        let local_witness_id = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("local witness id"))?;
        let doc_id = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| missing("doc id"))?;

        Ok(Self {
            work_id: work_id.to_string(),
            chunk_number,
            doc_id: doc_id.to_string(),
            local_witness_id: local_witness_id.to_string(),
            timestamp: timestamp.to_string(),
        })
    }
}

impl fmt::Display for WitnessSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}{}{}-{}-{}",
            self.work_id,
            self.chunk_number,
            FULL_TX_MARKER,
            self.doc_id,
            self.local_witness_id,
            self.timestamp
        )
    }
}

impl FromStr for WitnessSystemId {
    type Err = WitnessIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Strips `-`, `:`, `.` and spaces.
pub fn compact_timestamp(timestamp: &str) -> String {
    timestamp
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | '.' | ' '))
        .collect()
}

/// `2021-03-04 10:11:12.000123` style rendering.
pub fn canonical_timestamp(version: NaiveDateTime) -> String {
    version.format(TIMESTAMP_FORMAT).to_string()
}
