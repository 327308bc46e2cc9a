//! Grammar rules.
//!
//! - `items/`: the sub-grammar that reads the words around one entity or
//!   option (attributes, options, quantities) and the builders that turn
//!   them into scored items.
//! - `intent/`: the top-level add/remove/modify rule table.
//!
//! Both run on the engine's matcher (`engine/matcher.rs`). The services they
//! need are bundled in [`Services`], built once per interpretation run.

#[path = "rules/intent/mod.rs"]
pub(crate) mod intent;
#[path = "rules/items/mod.rs"]
pub(crate) mod items;

use crate::Graph;
use crate::world::World;
use items::PartsGrammar;

pub(crate) struct Services<'a> {
    pub world: &'a World,
    /// The filtered lattice of the whole utterance.
    pub graph: &'a Graph,
    pub parts: PartsGrammar<'a>,
}

impl<'a> Services<'a> {
    pub fn new(world: &'a World, graph: &'a Graph) -> Self {
        Services { world, graph, parts: PartsGrammar::new() }
    }
}
