use crate::engine::{self, RunResult};
use crate::world::{Lexer, State, World};
use crate::{Graph, Token};
use std::time::Duration;

/// Options that affect interpretation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Lattice edges scoring below this are dropped before tokenization.
    pub score_threshold: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options { score_threshold: 0.35 }
    }
}

/// Result from [`interpret`] and friends.
#[derive(Debug, Clone)]
pub struct InterpretResult {
    /// The interpreted utterance (empty for token and graph input).
    pub text: String,
    /// The state after applying the winning interpretation. Equal to the
    /// input state when nothing was understood.
    pub state: State,
    pub score: usize,
    pub token_count: usize,
    /// Whether any interpretation beat the no-op.
    pub understood: bool,
    pub elapsed: Duration,
}

/// One tokenization tried by the orchestrator.
#[derive(Debug, Clone)]
pub struct CandidateSummary {
    pub tokens: String,
    pub grouped: String,
    pub rules: Vec<String>,
    pub score: usize,
    pub token_count: usize,
    pub missed: usize,
    pub winner: bool,
}

/// Additional details returned by [`interpret_verbose_with`].
#[derive(Debug, Clone)]
pub struct InterpretDetails {
    pub total: Duration,
    /// Lattice filtering plus maximal path enumeration.
    pub tokenize: Duration,
    /// Grouping plus the intent grammar, over all paths.
    pub interpret: Duration,
    /// Edges left after filtering.
    pub edges: usize,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Clone)]
pub struct InterpretResultVerbose {
    pub result: InterpretResult,
    pub details: InterpretDetails,
}

/// Interpret `text` against `state` with default [`Options`].
///
/// # Example
/// ```
/// use short_order::world::{State, demo};
///
/// let (world, lexer) = demo::coffee_shop().unwrap();
/// let out = short_order::interpret(&world, &lexer, "two large lattes", &State::new());
/// assert_eq!(out.state.cart.len(), 1);
/// assert_eq!(out.state.cart.items[0].quantity, 2);
/// ```
pub fn interpret(world: &World, lexer: &impl Lexer, text: &str, state: &State) -> InterpretResult {
    interpret_with(world, lexer, text, state, &Options::default())
}

pub fn interpret_with(
    world: &World,
    lexer: &impl Lexer,
    text: &str,
    state: &State,
    options: &Options,
) -> InterpretResult {
    let graph = lexer.create_graph(text);
    InterpretResult { text: text.to_string(), ..interpret_graph(world, &graph, state, options) }
}

/// Interpret a prebuilt lattice, for callers bringing their own lexer output.
pub fn interpret_graph(world: &World, graph: &Graph, state: &State, options: &Options) -> InterpretResult {
    let run = engine::Parser::new(world, graph, options).run(state);
    to_result(String::new(), &run, state)
}

/// Interpret a single, already-tokenized reading.
pub fn interpret_tokens(world: &World, tokens: &[Token], state: &State) -> InterpretResult {
    interpret_graph(world, &Graph::from_tokens(tokens), state, &Options::default())
}

/// Interpret `text` and return every candidate the orchestrator weighed.
pub fn interpret_verbose_with(
    world: &World,
    lexer: &impl Lexer,
    text: &str,
    state: &State,
    options: &Options,
) -> InterpretResultVerbose {
    let graph = lexer.create_graph(text);
    let run = engine::Parser::new(world, &graph, options).run(state);
    let candidates = run
        .candidates
        .iter()
        .enumerate()
        .map(|(index, c)| CandidateSummary {
            tokens: c.tokens.clone(),
            grouped: c.grouped.clone(),
            rules: c.rules.iter().map(|r| r.to_string()).collect(),
            score: c.score,
            token_count: c.token_count,
            missed: c.missed,
            winner: run.winner == Some(index),
        })
        .collect();
    let details = InterpretDetails {
        total: run.metrics.total,
        tokenize: run.metrics.tokenize,
        interpret: run.metrics.interpret,
        edges: run.metrics.edges,
        candidates,
    };
    InterpretResultVerbose { result: to_result(text.to_string(), &run, state), details }
}

fn to_result(text: String, run: &RunResult, state: &State) -> InterpretResult {
    InterpretResult {
        text,
        state: run.interpretation.apply(state),
        score: run.interpretation.score,
        token_count: run.interpretation.token_count,
        understood: run.winner.is_some(),
        elapsed: run.metrics.total,
    }
}
