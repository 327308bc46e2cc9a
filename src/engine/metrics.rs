//! Run metrics for the orchestrator.
//!
//! `Parser::run` keeps one [`Candidate`] per maximal tokenization it tried,
//! so callers (the CLI, verbose API) can show why the winner won. Durations
//! are wall-clock and only meant for eyeballing.

use crate::Interpretation;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Parser::run`](super::Parser::run).
    pub total: Duration,
    /// Time spent filtering the lattice and enumerating maximal paths.
    pub tokenize: Duration,
    /// Time spent grouping and running the intent grammar over all paths.
    pub interpret: Duration,
    /// Number of edges left after filtering.
    pub edges: usize,
}

/// One tokenization the intent grammar was run over.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Rendered tokenization, before grouping.
    pub tokens: String,
    /// Rendered grammar input, after grouping.
    pub grouped: String,
    /// Names of the rules that matched, in order.
    pub rules: Vec<&'static str>,
    pub score: usize,
    pub token_count: usize,
    /// Lexical tokens the interpretation did not account for.
    pub missed: usize,
}

#[derive(Debug)]
pub struct RunResult {
    pub interpretation: Interpretation,
    /// Index of the winner in `candidates`; `None` when nothing beat the no-op.
    pub winner: Option<usize>,
    pub candidates: Vec<Candidate>,
    pub metrics: RunMetrics,
}
