//! Orchestrator: pick one interpretation for a whole utterance.
//!
//! ```text
//! Graph ── filter(threshold) ── maximal_tokenizations ──┬── path 1 ──┐
//!                                                       ├── path 2 ──┤ group
//!                                                       └── ...    ──┘ + intent grammar
//!                                                                        │
//!                                   keep the first candidate, replace it only by
//!                                   one with fewer missed tokens, or as many
//!                                   missed and fewer tokens consumed
//! ```
//!
//! `missed` is the tokenization length minus the interpretation score: a
//! reading that explains more of the words misses fewer. Between equally
//! good readings the one built from fewer lexical tokens is the more literal
//! one and wins. Every candidate is evaluated against its own copy of the
//! caller's state; nothing is applied until the caller applies the winner.

use super::group;
use super::lattice::Graph;
use super::metrics::{Candidate, RunMetrics, RunResult};
use crate::rules::Services;
use crate::rules::intent::{self, Context};
use crate::world::{State, World};
use crate::{Interpretation, Options, describe_all};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Parser<'a> {
    world: &'a World,
    /// The score-filtered, duplicate-free lattice.
    graph: Graph,
    filter_time: Duration,
}

impl<'a> Parser<'a> {
    pub fn new(world: &'a World, graph: &Graph, options: &Options) -> Self {
        let start = Instant::now();
        let graph = graph.filter(options.score_threshold);
        Parser { world, graph, filter_time: start.elapsed() }
    }

    /// Run every maximal tokenization through the intent grammar against
    /// `state` and keep the preferred candidate.
    pub fn run(&self, state: &State) -> RunResult {
        let total_start = Instant::now();
        let tokenizations = self.graph.maximal_tokenizations();
        let tokenize = self.filter_time + total_start.elapsed();
        tracing::debug!(paths = tokenizations.len(), "maximal tokenizations");

        let interpret_start = Instant::now();
        let services = Services::new(self.world, &self.graph);
        let grammar = intent::grammar();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(tokenizations.len());
        let mut best: Option<(Interpretation, usize)> = None;

        for tokens in &tokenizations {
            let grouped = group(tokens);
            let (context, rules) = grammar.process_with_trace(Context::new(&services, state.clone()), &grouped);
            let interpretation = context.into_interpretation();
            let candidate = Candidate {
                tokens: describe_all(tokens),
                grouped: describe_all(&grouped),
                rules,
                score: interpretation.score,
                token_count: interpretation.token_count,
                missed: tokens.len().saturating_sub(interpretation.score),
            };
            tracing::debug!(
                tokens = %candidate.grouped,
                score = candidate.score,
                missed = candidate.missed,
                token_count = candidate.token_count,
                "candidate"
            );
            let index = candidates.len();
            if best.as_ref().is_none_or(|(_, incumbent)| prefer(&candidate, &candidates[*incumbent])) {
                best = Some((interpretation, index));
            }
            candidates.push(candidate);
        }
        let interpret = interpret_start.elapsed();

        let (interpretation, winner) = match best {
            Some((interpretation, index)) if !interpretation.is_nop() => {
                tracing::debug!(winner = index, score = interpretation.score, "selected interpretation");
                (interpretation, Some(index))
            }
            _ => {
                tracing::debug!("no interpretation, state unchanged");
                (Interpretation::nop(), None)
            }
        };

        let metrics =
            RunMetrics { total: self.filter_time + total_start.elapsed(), tokenize, interpret, edges: self.edges() };
        RunResult { interpretation, winner, candidates, metrics }
    }

    fn edges(&self) -> usize {
        self.graph.edge_count()
    }
}

/// True when `candidate` should replace `incumbent`.
fn prefer(candidate: &Candidate, incumbent: &Candidate) -> bool {
    candidate.missed < incumbent.missed
        || (candidate.missed == incumbent.missed && candidate.token_count < incumbent.token_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Lexer;
    use crate::world::demo::{self, CHOCOLATE, CONE, SMALL};

    fn candidate(missed: usize, token_count: usize) -> Candidate {
        Candidate {
            tokens: String::new(),
            grouped: String::new(),
            rules: Vec::new(),
            score: 0,
            token_count,
            missed,
        }
    }

    #[test]
    fn fewer_missed_tokens_always_wins() {
        assert!(prefer(&candidate(1, 9), &candidate(2, 1)));
        assert!(!prefer(&candidate(2, 1), &candidate(1, 9)));
    }

    #[test]
    fn equal_missed_prefers_fewer_tokens() {
        assert!(prefer(&candidate(1, 3), &candidate(1, 4)));
        assert!(!prefer(&candidate(1, 4), &candidate(1, 3)));
    }

    #[test]
    fn exact_tie_keeps_the_incumbent() {
        assert!(!prefer(&candidate(1, 3), &candidate(1, 3)));
    }

    #[test]
    fn run_adds_an_item_from_text() {
        let (world, lexer) = demo::coffee_shop().unwrap();
        let graph = lexer.create_graph("add a small chocolate cone");
        let parser = Parser::new(&world, &graph, &Options::default());
        let run = parser.run(&State::new());

        assert!(run.winner.is_some());
        let state = run.interpretation.apply(&State::new());
        assert_eq!(state.cart.len(), 1);
        let item = &state.cart.items[0];
        assert_eq!(item.key, world.key_for(CONE, &[SMALL, CHOCOLATE]).unwrap());
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn gibberish_leaves_state_unchanged() {
        let (world, lexer) = demo::coffee_shop().unwrap();
        let graph = lexer.create_graph("purple monkey dishwasher");
        let run = Parser::new(&world, &graph, &Options::default()).run(&State::new());

        assert_eq!(run.winner, None);
        assert!(run.interpretation.is_nop());
        assert!(!run.candidates.is_empty());
    }
}
