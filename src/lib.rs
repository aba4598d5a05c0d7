//! Workspace umbrella crate for Collatio.
//!
//! This crate stitches the stage crates together so callers can go from
//! document transcriptions to collation input with a single API entry point:
//! one witness per requested document range, each diffed against the first.

pub mod config;

pub use config::{CollatioConfig, ConfigLoadError, WitnessYamlConfig};
pub use diff::{
    apply_edit_script, diff_against_base, diff_eq, diff_tokens, edit_distance, AbortHandle,
    CooperativeDiff, DiffConfig, DiffError, DiffState, EditCommand, EditOp, Tick,
};
pub use token::{
    detokenize, tokenize, IntRange, LineRange, NormalizerKind, PunctuationOverride,
    PunctuationTable, StringTokenizer, Token, TokenType, TokenizerConfig, TokenizerConfigError,
};
pub use transcription::{
    Bound, DocumentBound, DocumentTranscription, IndexKind, Item, ItemAddressInDocument,
    ItemAddressInPage, ItemInDocument, ItemKind, MarkType, PageBound, PageTranscription, TextBox,
    TextBoxKind, TranscriptionError,
};
pub use witness::{
    build_witness, NonTokenItemIndexes, TranscriptionToken, TranscriptionWitness,
    WitnessBuilder, WitnessConfig, WitnessError, WitnessIdError, WitnessSystemId,
};

use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use tracing::{info, warn, Level};

/// Errors that can occur while collating documents through the pipeline.
///
/// Tokenizer configuration and item range problems both surface through
/// [`WitnessError`]; pairwise diffing cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Witness(WitnessError),
    NoWitnesses,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Witness(err) => write!(f, "witness construction failed: {err}"),
            PipelineError::NoWitnesses => write!(f, "collation needs at least one witness"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Witness(err) => Some(err),
            PipelineError::NoWitnesses => None,
        }
    }
}

impl From<WitnessError> for PipelineError {
    fn from(value: WitnessError) -> Self {
        PipelineError::Witness(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_witness(&self, latency: Duration, result: Result<(), WitnessError>);
    /// One call per collation, covering all pairwise diffs.
    fn record_diff(&self, latency: Duration, witnesses: usize, total_edit_distance: usize);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_witness(self, result: Result<(), WitnessError>) {
        self.recorder.record_witness(self.start.elapsed(), result);
    }

    fn record_diff(self, witnesses: usize, total_edit_distance: usize) {
        self.recorder
            .record_diff(self.start.elapsed(), witnesses, total_edit_distance);
    }
}

/// One witness to build: a document, the item range to read, and the chunk
/// of the work it transcribes.
#[derive(Debug, Clone)]
pub struct WitnessRequest<'a> {
    pub doc: &'a DocumentTranscription,
    pub work_id: String,
    pub chunk_number: u32,
    pub lower: DocumentBound,
    pub upper: DocumentBound,
}

impl<'a> WitnessRequest<'a> {
    /// Request covering every transcribed page of `doc`.
    pub fn whole_document(
        doc: &'a DocumentTranscription,
        work_id: impl Into<String>,
        chunk_number: u32,
    ) -> Self {
        Self {
            doc,
            work_id: work_id.into(),
            chunk_number,
            lower: Bound::Start,
            upper: Bound::End,
        }
    }

    pub fn with_bounds(mut self, lower: DocumentBound, upper: DocumentBound) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }
}

/// What a collation-table assembler consumes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollationInput {
    /// In request order; the first one is the base.
    pub witnesses: Vec<TranscriptionWitness>,
    /// `edit_scripts[i]` turns the base into `witnesses[i + 1]`.
    pub edit_scripts: Vec<Vec<EditOp>>,
}

impl CollationInput {
    pub fn base(&self) -> Option<&TranscriptionWitness> {
        self.witnesses.first()
    }

    /// Script from the base to witness `index`; the base itself has none.
    pub fn script_for(&self, index: usize) -> Option<&[EditOp]> {
        index
            .checked_sub(1)
            .and_then(|i| self.edit_scripts.get(i))
            .map(Vec::as_slice)
    }
}

/// Builds one witness per request and diffs each against the first.
///
/// Every witness is built before any diff runs; the first failing request
/// aborts the collation.
pub fn collate_documents(
    requests: &[WitnessRequest<'_>],
    cfg: &CollatioConfig,
) -> Result<CollationInput, PipelineError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "collate", witnesses = requests.len());
    let _guard = span.enter();

    if requests.is_empty() {
        warn!("collation_without_witnesses");
        return Err(PipelineError::NoWitnesses);
    }
    let builder = WitnessBuilder::new(&cfg.witness_config())?;

    let mut witnesses = Vec::with_capacity(requests.len());
    for (position, request) in requests.iter().enumerate() {
        let mut witness_metrics = MetricsSpan::start();
        match builder.build(
            request.doc,
            &request.work_id,
            request.chunk_number,
            request.lower,
            request.upper,
        ) {
            Ok(witness) => {
                if let Some(span) = witness_metrics.take() {
                    span.record_witness(Ok(()));
                }
                witnesses.push(witness);
            }
            Err(err) => {
                if let Some(span) = witness_metrics.take() {
                    span.record_witness(Err(err.clone()));
                }
                warn!(
                    position,
                    doc_id = %request.doc.doc_id,
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros() as u64,
                    "collation_failure"
                );
                return Err(PipelineError::Witness(err));
            }
        }
    }

    let mut diff_metrics = MetricsSpan::start();
    let (base, others) = witnesses.split_at(1);
    let other_tokens: Vec<&[TranscriptionToken]> =
        others.iter().map(|w| w.tokens.as_slice()).collect();
    let edit_scripts = diff_against_base(&base[0].tokens, &other_tokens, &cfg.diff);
    let total_edit_distance: usize = edit_scripts.iter().map(|ops| edit_distance(ops)).sum();
    if let Some(span) = diff_metrics.take() {
        span.record_diff(other_tokens.len(), total_edit_distance);
    }

    info!(
        witnesses = witnesses.len(),
        base_tokens = base[0].tokens.len(),
        total_edit_distance,
        elapsed_micros = start.elapsed().as_micros() as u64,
        "collation_done"
    );

    Ok(CollationInput {
        witnesses,
        edit_scripts,
    })
}
