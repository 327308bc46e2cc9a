//! Target resolution: which cart items a span of the utterance refers to.
//!
//! References are often under-specified ("the cone" when two cones are in the
//! cart) and their words may score poorly in the full lattice, so resolution
//! does not trust the tokenization it was handed:
//!
//! 1. Restrict the lattice to the span, keeping only entity, option and
//!    attribute readings that occur somewhere in the relevant part of the
//!    cart. Other readings pass through.
//! 2. Walk every tokenization of that sub-lattice, not only the best ones.
//! 3. Read each one with the target builders and look up the matching items.
//!
//! Each matching item is reported once, with the best score any reading gave
//! it. Results are ordered by score, then most recent first.

use super::splitter::{Segment, split_on_entities};
use crate::rules::Services;
use crate::rules::items::{build_option_target, build_target};
use crate::world::{Cart, ItemInstance};
use crate::{Aid, Hypothetical, HypotheticalItem, Pid, Span, Token, Uid};
use std::collections::{BTreeMap, HashSet};

/// Words an utterance can use to name things in the cart.
#[derive(Debug, Default)]
struct Vocabulary {
    entities: HashSet<Pid>,
    options: HashSet<Pid>,
    attributes: HashSet<Aid>,
}

impl Vocabulary {
    fn admits(&self, token: &Token) -> bool {
        match token {
            Token::Entity { pid, .. } => self.entities.contains(pid),
            Token::Option { id, .. } => self.options.contains(id),
            Token::Attribute { id, .. } => self.attributes.contains(id),
            _ => true,
        }
    }

    fn add_item(&mut self, services: &Services<'_>, item: &ItemInstance) {
        self.entities.insert(item.key.pid);
        self.attributes.extend(services.world.attributes_of(&item.key));
        self.add_children(services, item);
    }

    fn add_children(&mut self, services: &Services<'_>, item: &ItemInstance) {
        for child in &item.children {
            self.options.insert(child.key.pid);
            self.attributes.extend(services.world.attributes_of(&child.key));
        }
        if let Some(generic) = services.world.catalog.generic(item.key.pid) {
            self.options.extend(generic.default_options.iter().copied());
        }
    }
}

/// Keeps the best score per item.
#[derive(Default)]
struct Best {
    found: BTreeMap<(Uid, Pid), HypotheticalItem>,
}

impl Best {
    fn offer(&mut self, candidate: HypotheticalItem) {
        let Some(item) = &candidate.item else {
            return;
        };
        let id = (item.uid, item.key.pid);
        match self.found.get(&id) {
            Some(existing) if existing.score >= candidate.score => {}
            _ => {
                self.found.insert(id, candidate);
            }
        }
    }

    /// Score descending, then by `recency` descending.
    fn ranked(self, recency: impl Fn(&ItemInstance) -> usize) -> Vec<HypotheticalItem> {
        let mut ranked: Vec<HypotheticalItem> = self.found.into_values().collect();
        ranked.sort_by_key(|h| {
            let recent = h.item.as_ref().map_or(0, &recency);
            (std::cmp::Reverse(h.score), std::cmp::Reverse(recent))
        });
        ranked
    }
}

/// Top-level cart items the words in `span` refer to, best first.
pub(crate) fn resolve_targets(services: &Services<'_>, cart: &Cart, span: Span) -> Vec<HypotheticalItem> {
    let mut vocabulary = Vocabulary::default();
    for item in &cart.items {
        vocabulary.add_item(services, item);
    }
    let lattice = services.graph.restrict(span, |t| vocabulary.admits(t));

    let mut best = Best::default();
    for tokenization in lattice.all_tokenizations() {
        let (entities, gaps) = split_on_entities(&tokenization);
        let [entity] = entities.as_slice() else {
            continue;
        };
        let segment = Segment { left: gaps[0], entity, right: gaps[1] };
        let Hypothetical { item: Some(target), score, .. } = build_target(services, &segment) else {
            continue;
        };
        for item in cart.find_by_pattern(&target.pattern).into_iter().filter(|i| target.carries_options(i)) {
            best.offer(Hypothetical::some(item.clone(), score, span.length));
        }
    }
    let ranked = best.ranked(|item| cart.recency(item.uid).unwrap_or(0));
    tracing::debug!(?span, found = ranked.len(), "resolved targets");
    ranked
}

/// Children of `parent` the words in `span` refer to, best first.
///
/// A default option the parent comes with but that is not in its children
/// (it was never touched) is reported as a fresh child with `uid` 0, so it can
/// be recorded as removed.
pub(crate) fn resolve_option_targets(
    services: &Services<'_>,
    parent: &ItemInstance,
    span: Span,
) -> Vec<HypotheticalItem> {
    let world = services.world;
    let mut vocabulary = Vocabulary::default();
    vocabulary.add_children(services, parent);
    let lattice = services.graph.restrict(span, |t| vocabulary.admits(t));

    let mut best = Best::default();
    for tokenization in lattice.all_tokenizations() {
        let Hypothetical { item: Some(target), score, .. } = build_option_target(services, &tokenization) else {
            continue;
        };
        let mut matched = false;
        for child in parent.children.iter().filter(|c| target.matches(c)) {
            matched = true;
            best.offer(Hypothetical::some(child.clone(), score, span.length));
        }
        let is_default = world.catalog.is_default_option(parent.key.pid, target.pid);
        let untouched = !parent.children.iter().any(|c| c.key.pid == target.pid);
        if !matched && is_default && untouched {
            if let Some(key) = world.default_key(target.pid) {
                best.offer(Hypothetical::some(ItemInstance::new(key, 1), score, span.length));
            }
        }
    }
    best.ranked(|child| parent.children.iter().position(|c| c.uid == child.uid).unwrap_or(0))
}
