//! Menu knowledge base and order state.
//!
//! The interpretation engine consumes this module as a service:
//!
//! - `attributes.rs`: dimensions, matrices and the SKU key encoding.
//! - `catalog.rs`: generic products/options and which SKUs exist.
//! - `constraints.rs`: legal children and mutual exclusion between options.
//! - `cookbook.rs`: option recipes.
//! - `cart.rs`: the immutable cart and item trees.
//! - `lexer.rs`: the lexer trait and an alias-matching implementation.
//! - `demo.rs`: a small menu for the CLI and tests.

#[path = "world/attributes.rs"]
mod attributes;
#[path = "world/cart.rs"]
mod cart;
#[path = "world/catalog.rs"]
mod catalog;
#[path = "world/constraints.rs"]
mod constraints;
#[path = "world/cookbook.rs"]
mod cookbook;
#[path = "world/demo.rs"]
pub mod demo;
#[path = "world/lexer.rs"]
mod lexer;

pub use attributes::{Attribute, AttributeInfo, Dimension, Key, KeyPattern, Matrix};
pub use cart::{Cart, ItemInstance, State};
pub use catalog::{Catalog, GenericItem, ItemKind};
pub use constraints::{KeyMatcher, RuleChecker};
pub use cookbook::{Cookbook, OptionRecipe, RecipeOption};
pub use lexer::{AliasLexer, Lexer};

use crate::{Aid, Pid};

#[derive(Debug, Clone, Default)]
pub struct World {
    pub attributes: AttributeInfo,
    pub catalog: Catalog,
    pub rules: RuleChecker,
    pub cookbook: Cookbook,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// The matrix configuring generic `pid`.
    pub fn matrix_for(&self, pid: Pid) -> Option<&Matrix> {
        self.attributes.matrix(self.catalog.generic(pid)?.matrix)
    }

    /// Concrete key for `pid` with `attributes`; dimensions without an
    /// attribute take their default, attributes outside the matrix are ignored.
    pub fn key_for(&self, pid: Pid, attributes: &[Aid]) -> Option<Key> {
        Some(self.matrix_for(pid)?.get_key(pid, attributes))
    }

    pub fn default_key(&self, pid: Pid) -> Option<Key> {
        self.key_for(pid, &[])
    }

    /// Wildcard key for `pid`: dimensions without an attribute match any value.
    pub fn pattern_for(&self, pid: Pid, attributes: &[Aid]) -> Option<KeyPattern> {
        Some(self.matrix_for(pid)?.pattern(pid, attributes))
    }

    /// Attribute ids encoded by `key`.
    pub fn attributes_of(&self, key: &Key) -> Vec<Aid> {
        self.matrix_for(key.pid).map(|m| m.attributes(key.index)).unwrap_or_default()
    }

    /// Every attribute id and name, in dimension order.
    pub fn attribute_names(&self) -> Vec<(Aid, String)> {
        let mut matrices: Vec<&Matrix> =
            self.catalog.generics().filter_map(|g| self.attributes.matrix(g.matrix)).collect();
        matrices.dedup_by_key(|m| m.id);
        let mut names: Vec<(Aid, String)> = Vec::new();
        for dimension in matrices.iter().flat_map(|m| &m.dimensions) {
            for attribute in &dimension.attributes {
                if !names.iter().any(|(aid, _)| *aid == attribute.aid) {
                    names.push((attribute.aid, attribute.name.clone()));
                }
            }
        }
        names
    }

    pub fn name(&self, pid: Pid) -> &str {
        self.catalog.generic(pid).map_or("?", |g| g.name.as_str())
    }

    /// Children described by an option recipe, with keys resolved against
    /// each option's matrix. Options whose key is not sold are skipped.
    pub fn create_items_from_option_recipe(&self, recipe: &OptionRecipe) -> Vec<ItemInstance> {
        recipe
            .options
            .iter()
            .filter_map(|option| {
                let key = self.key_for(option.pid, &option.attributes)?;
                self.catalog.has_key(&key).then(|| ItemInstance::new(key, option.quantity))
            })
            .collect()
    }

    /// Human-readable rendering, e.g. `2 large decaf coffee (no milk, 2 espresso shot)`.
    pub fn describe(&self, item: &ItemInstance) -> String {
        let mut words: Vec<String> = Vec::new();
        if item.quantity != 1 {
            words.push(item.quantity.to_string());
        }
        if let Some(matrix) = self.matrix_for(item.key.pid) {
            for (dimension, position) in matrix.dimensions.iter().zip(matrix.positions(item.key.index)) {
                if position != dimension.default_position() {
                    if let Some(attribute) = dimension.attributes.get(position) {
                        words.push(attribute.name.clone());
                    }
                }
            }
        }
        words.push(self.name(item.key.pid).to_string());
        let mut text = words.join(" ");
        if !item.children.is_empty() {
            let children: Vec<String> = item
                .children
                .iter()
                .map(|child| match child.quantity {
                    0 => format!("no {}", self.name(child.key.pid)),
                    _ => self.describe(child),
                })
                .collect();
            text.push_str(&format!(" ({})", children.join(", ")));
        }
        text
    }
}
