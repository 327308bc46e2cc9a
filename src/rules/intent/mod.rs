//! Top-level intent grammar: add, remove and modify.
//!
//! Runs over a grouped tokenization (see `engine/grouping.rs`). Each rule's
//! production builds an [`Interpretation`] for what its match means and
//! applies it at once to the context's local state, so a later rule in the
//! same utterance sees the earlier edits ("add a coffee and make it large").
//! The context also accumulates score and token count for the orchestrator.

#[path = "helpers.rs"]
mod helpers;
#[path = "rules_add.rs"]
mod rules_add;
#[path = "rules_modify.rs"]
mod rules_modify;
#[path = "rules_remove.rs"]
mod rules_remove;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

use crate::engine::Grammar;
use crate::rules::Services;
use crate::world::{State, World};
use crate::{Interpretation, Rule};

#[derive(Clone)]
pub(crate) struct Context<'a> {
    pub services: &'a Services<'a>,
    pub state: State,
    pub score: usize,
    pub token_count: usize,
}

impl<'a> Context<'a> {
    pub fn new(services: &'a Services<'a>, state: State) -> Self {
        Context { services, state, score: 0, token_count: 0 }
    }

    pub fn world(&self) -> &'a World {
        self.services.world
    }

    /// The context after `interpretation` has been applied to the local state.
    pub fn apply(&self, interpretation: Interpretation) -> Self {
        Context {
            services: self.services,
            state: interpretation.apply(&self.state),
            score: self.score + interpretation.score,
            token_count: self.token_count + interpretation.token_count,
        }
    }

    /// The whole run as one interpretation: it replays the final local state.
    pub fn into_interpretation(self) -> Interpretation {
        let state = self.state;
        Interpretation::new(self.score, self.token_count, move |_| state.clone())
    }
}

pub(crate) fn grammar<'a>() -> Grammar<Context<'a>> {
    let rules: Vec<Rule<Context<'a>>> =
        [rules_add::rules(), rules_remove::rules(), rules_modify::rules()].into_iter().flatten().collect();
    Grammar::new("intent", rules)
}
