//! Item parts sub-grammar and item builders.
//!
//! Every builder reads the words around its anchor (an entity, an option, or
//! an existing cart item) with the same [`PartsGrammar`]:
//!
//! ```text
//! left run:   [CONJUNCTION]? [NUMBER | QUANTITY]?  remaining...
//! right run:  remaining...
//!
//! remaining, first match wins at each position:
//!   CONJUNCTION                               skip
//!   OPTION_RECIPE                             expand recipe
//!   NUMBER? UNIT? ATTRIBUTE OPTION            attribute configures the option
//!   NUMBER? UNIT? OPTION                      option, quantity defaults to 1
//!   ATTRIBUTE                                 configures the anchor, one per dimension
//!   anything else                             discarded
//! ```
//!
//! A leading NUMBER is not read as the quantity when a UNIT or an OPTION
//! comes right after it: that number measures an option ("2 pumps vanilla syrup",
//! "two shots"), not the item. A bare number ("make it two") is the item's.
//!
//! A builder's score is 1 for its anchor plus every token the grammar put to
//! use; tokens of options the menu rules reject are taken back off.

#[path = "entity.rs"]
mod entity;
#[path = "modification.rs"]
mod modification;
#[path = "option_target.rs"]
mod option_target;
#[path = "parts.rs"]
mod parts;
#[path = "replacement.rs"]
mod replacement;
#[path = "target.rs"]
mod target;


pub(crate) use entity::build_entity;
pub(crate) use modification::build_modification;
pub(crate) use option_target::{OptionTarget, build_option_target};
pub(crate) use replacement::build_replacement;
pub(crate) use target::{Target, build_target};

use crate::engine::Grammar;
use crate::world::{ItemInstance, Key, Matrix, World};
use crate::{Aid, Did, Pid, Rid, Spanned, Token, TokenType};

/// An option read from the words, not yet checked against the menu rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionPart {
    pub pid: Pid,
    pub attributes: Vec<Aid>,
    pub quantity: u32,
    /// Tokens spent on this option.
    pub tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Part {
    Option(OptionPart),
    Recipe { rid: Rid, tokens: usize },
}

/// What the parts grammar has read so far around one anchor.
#[derive(Debug, Clone)]
pub(crate) struct PartsContext<'a> {
    pub world: &'a World,
    /// Matrix of the anchor; `None` when there is no anchor item.
    pub matrix: Option<&'a Matrix>,
    pub quantity: Option<u32>,
    pub attributes: Vec<Aid>,
    pub dimensions: Vec<Did>,
    pub parts: Vec<Part>,
    /// Tokens put to use.
    pub used: usize,
}

impl<'a> PartsContext<'a> {
    pub fn new(world: &'a World, matrix: Option<&'a Matrix>) -> Self {
        PartsContext {
            world,
            matrix,
            quantity: None,
            attributes: Vec::new(),
            dimensions: Vec::new(),
            parts: Vec::new(),
            used: 0,
        }
    }

    /// Context for reading the words around generic `pid`.
    pub fn anchored(world: &'a World, pid: Pid) -> Self {
        PartsContext::new(world, world.matrix_for(pid))
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionPart> {
        self.parts.iter().filter_map(|part| match part {
            Part::Option(option) => Some(option),
            Part::Recipe { .. } => None,
        })
    }
}

pub(crate) struct PartsGrammar<'a> {
    remaining: Grammar<PartsContext<'a>>,
}

impl<'a> PartsGrammar<'a> {
    pub fn new() -> Self {
        PartsGrammar { remaining: Grammar::new("parts", parts::rules()) }
    }

    /// Read the run left of the anchor, then the run right of it.
    pub fn run(&self, context: PartsContext<'a>, left: &[Spanned], right: &[Spanned]) -> PartsContext<'a> {
        let context = self.process_left(context, left);
        self.process_remaining(context, right)
    }

    pub fn process_left(&self, context: PartsContext<'a>, tokens: &[Spanned]) -> PartsContext<'a> {
        let mut context = context;
        let mut rest = tokens;
        if rest.first().is_some_and(|s| s.token == Token::Conjunction) {
            context.used += 1;
            rest = &rest[1..];
        }
        if !measures_an_option(rest) {
            if let Some(value) = rest.first().and_then(|s| quantity_value(&s.token)) {
                context.quantity = Some(value);
                context.used += 1;
                rest = &rest[1..];
            }
        }
        self.process_remaining(context, rest)
    }

    pub fn process_remaining(&self, context: PartsContext<'a>, tokens: &[Spanned]) -> PartsContext<'a> {
        self.remaining.process(context, tokens)
    }
}

fn quantity_value(token: &Token) -> Option<u32> {
    match token {
        Token::Number { value } | Token::Quantity { value } => Some(*value),
        _ => None,
    }
}

fn measures_an_option(tokens: &[Spanned]) -> bool {
    match tokens {
        [first, next, ..] => {
            first.token.token_type() == TokenType::Number
                && matches!(next.token.token_type(), TokenType::Unit | TokenType::Option)
        }
        _ => false,
    }
}

/// Add the options read by a builder to `children` of the item keyed
/// `parent`. Returns the merged children and the number of tokens spent on
/// options the menu rules rejected.
///
/// A new option with the same key as a child adds to its quantity; one in
/// conflict with a child (same generic or same exclusion set) replaces it;
/// anything else is appended. New options are also checked against each
/// other: the second member of an exclusion set is rejected.
pub(crate) fn merge_options(
    world: &World,
    parent: &Key,
    children: Vec<ItemInstance>,
    parts: &[Part],
) -> (Vec<ItemInstance>, usize) {
    let mut children = children;
    let mut rejected = 0;
    let mut admit = world.rules.mutual_exclusion_predicate(parent);

    for part in parts {
        let (candidates, tokens) = match part {
            Part::Option(option) => {
                let key = world.key_for(option.pid, &option.attributes).filter(|k| world.catalog.has_key(k));
                let items: Vec<ItemInstance> = key.map(|k| ItemInstance::new(k, option.quantity)).into_iter().collect();
                (items, option.tokens)
            }
            Part::Recipe { rid, tokens } => {
                let items = world
                    .cookbook
                    .find_option_recipe(*rid, parent)
                    .map(|recipe| world.create_items_from_option_recipe(recipe))
                    .unwrap_or_default();
                (items, *tokens)
            }
        };

        let mut accepted = false;
        for item in candidates {
            if !world.rules.is_valid_child(parent, &item.key) || !admit(&item.key) {
                continue;
            }
            accepted = true;
            if let Some(same) = children.iter_mut().find(|c| c.key == item.key) {
                same.quantity += item.quantity;
            } else if let Some(rival) = children.iter_mut().find(|c| world.rules.conflicts(parent, &c.key, &item.key)) {
                *rival = item;
            } else {
                children.push(item);
            }
        }
        if !accepted {
            tracing::debug!(parent = %parent, ?part, "option rejected");
            rejected += tokens;
        }
    }
    (children, rejected)
}

/// Number of lexical tokens in a run.
pub(crate) fn token_count(tokens: &[Spanned]) -> usize {
    tokens.iter().map(Spanned::token_count).sum()
}
