//! Interpretation engine.
//!
//! Everything between "a lattice of scored tokens" and "the winning
//! interpretation" lives under `src/engine/`. The lexer (in `world/`) builds
//! the lattice and the rule tables (in `rules/`) say what the token sequences
//! mean. This module holds the machinery that connects the two.
//!
//! ## How the parts work together
//!
//! ```text
//! Graph (lexer output)
//!   │  Graph::filter(threshold)                    (lattice.rs, dedup.rs)
//!   v
//! filtered Graph ── maximal_tokenizations ──┐
//!                                           │ one per optimal path
//!                                           v
//!                                group (grouping.rs)
//!                                  - drop UNKNOWN fillers
//!                                  - fold product parts into PRODUCT_PARTS_*
//!                                           │
//!                                           v
//!                        Grammar::process (matcher.rs, cursor.rs)
//!                          - gate rules by TokenMask (trigger.rs,
//!                            compiled_rules.rs)
//!                          - productions call the item builders, which
//!                            use split/resolve (splitter.rs, resolve.rs)
//!                                           │
//!                                           v
//!                        Parser keeps the candidate with the fewest
//!                        missed tokens (parser.rs, metrics.rs)
//!                                           │
//!                                           v
//!                                    Interpretation
//! ```
//!
//! ## Responsibilities by module
//!
//! - `cursor.rs`: read position over a token slice with a mark stack.
//! - `matcher.rs`: the ordered-rule pattern matcher shared by both grammars.
//! - `compiled_rules.rs` / `trigger.rs`: per-input rule gating.
//! - `lattice.rs` / `dedup.rs`: the scored token graph and its enumeration.
//! - `grouping.rs`: turns a tokenization into grammar input.
//! - `splitter.rs`: assigns the words around entities to those entities.
//! - `resolve.rs`: finds the cart items (or options) a phrase refers to.
//! - `parser.rs`: the orchestrator.
//! - `metrics.rs`: timing and per-candidate debug data.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/cursor.rs"]
mod cursor;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/grouping.rs"]
mod grouping;
#[path = "engine/lattice.rs"]
mod lattice;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/splitter.rs"]
mod splitter;
#[path = "engine/trigger.rs"]
mod trigger;

pub use lattice::{Edge, Graph};
pub(crate) use grouping::group;
pub(crate) use matcher::Grammar;
pub(crate) use metrics::RunResult;
pub(crate) use parser::Parser;
pub(crate) use resolve::{resolve_option_targets, resolve_targets};
pub(crate) use splitter::{Segment, segmentations, split_on_entities};
