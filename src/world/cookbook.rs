//! Named bundles of options ("the works") that expand into several children.

use super::attributes::Key;
use super::constraints::KeyMatcher;
use crate::{Aid, DataError, Pid, Rid};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOption {
    pub pid: Pid,
    pub attributes: Vec<Aid>,
    pub quantity: u32,
}

impl RecipeOption {
    pub fn new(pid: Pid) -> Self {
        RecipeOption { pid, attributes: Vec::new(), quantity: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecipe {
    pub rid: Rid,
    pub name: String,
    /// Parents the recipe applies to.
    pub parent: KeyMatcher,
    pub options: Vec<RecipeOption>,
}

#[derive(Debug, Clone, Default)]
pub struct Cookbook {
    recipes: HashMap<Rid, OptionRecipe>,
}

impl Cookbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_option_recipe(
        &mut self,
        rid: Rid,
        name: &str,
        parent: &str,
        options: Vec<RecipeOption>,
    ) -> Result<(), DataError> {
        if self.recipes.contains_key(&rid) {
            return Err(DataError::DuplicateRecipe(rid));
        }
        let parent = KeyMatcher::parse(parent)?;
        self.recipes.insert(rid, OptionRecipe { rid, name: name.to_string(), parent, options });
        Ok(())
    }

    /// The recipe `rid`, if it applies to `parent`.
    pub fn find_option_recipe(&self, rid: Rid, parent: &Key) -> Option<&OptionRecipe> {
        self.recipes.get(&rid).filter(|recipe| recipe.parent.matches(parent))
    }

    pub fn option_recipes(&self) -> impl Iterator<Item = &OptionRecipe> {
        self.recipes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipes_are_scoped_to_their_parent() {
        let mut book = Cookbook::new();
        book.add_option_recipe(1, "the works", "9000", vec![RecipeOption::new(5100)]).unwrap();
        assert!(book.find_option_recipe(1, &Key::new(9000, 3)).is_some());
        assert!(book.find_option_recipe(1, &Key::new(9100, 0)).is_none());
        assert_eq!(book.add_option_recipe(1, "again", "*", vec![]), Err(DataError::DuplicateRecipe(1)));
        assert!(matches!(book.add_option_recipe(2, "bad", "cone", vec![]), Err(DataError::UnknownMatcher(_))));
    }
}
