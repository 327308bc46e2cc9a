//! Lexer service: turns an utterance into a token lattice.
//!
//! [`AliasLexer`] is a plain exact-match lexer over menu names and a fixed
//! table of intent words. It scores every alias match 1.0 and adds an
//! `UNKNOWN` filler edge of score 0 at every position so that the lattice is
//! always connected.

use super::World;
use super::catalog::ItemKind;
use crate::{Aid, Edge, Graph, Pid, Token, UnitId};
use std::collections::HashMap;

pub trait Lexer {
    fn create_graph(&self, text: &str) -> Graph;
    fn entity_token(&self, pid: Pid) -> Option<Token>;
    fn attribute_token(&self, aid: Aid) -> Option<Token>;
}

const STOPWORDS: &[&str] = &["the", "that", "it", "this", "my", "some", "of", "um", "uh"];

const INTENT_WORDS: &[(&str, Token)] = &[
    ("add", Token::AddToOrder),
    ("i'd like", Token::AddToOrder),
    ("i would like", Token::AddToOrder),
    ("i want", Token::AddToOrder),
    ("i'll have", Token::AddToOrder),
    ("get me", Token::AddToOrder),
    ("give me", Token::AddToOrder),
    ("please", Token::Prologue),
    ("hi", Token::Prologue),
    ("hello", Token::Prologue),
    ("ok", Token::Prologue),
    ("okay", Token::Prologue),
    ("can i", Token::Prologue),
    ("could i", Token::Prologue),
    ("could you", Token::Prologue),
    ("remove", Token::RemoveItem),
    ("cancel", Token::RemoveItem),
    ("drop", Token::RemoveItem),
    ("take off", Token::RemoveItem),
    ("no", Token::RemoveItem),
    ("make", Token::ModifyItem),
    ("change", Token::ModifyItem),
    ("switch", Token::ModifyItem),
    ("replace", Token::ModifyItem),
    ("swap", Token::ModifyItem),
    ("to", Token::Preposition),
    ("with", Token::Preposition),
    ("on", Token::Preposition),
    ("into", Token::Preposition),
    ("from", Token::Preposition),
    ("in", Token::Preposition),
    ("and", Token::Conjunction),
    ("plus", Token::Conjunction),
    ("also", Token::Conjunction),
    ("with", Token::Conjunction),
];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

const QUANTITY_WORDS: &[(&str, u32)] = &[("a", 1), ("an", 1), ("a couple", 2), ("a few", 3)];

#[derive(Debug, Clone, Default)]
pub struct AliasLexer {
    aliases: Vec<(Vec<String>, Token)>,
    entities: HashMap<Pid, Token>,
    attributes: HashMap<Aid, Token>,
}

fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    regex!(r"[a-z0-9']+")
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

impl AliasLexer {
    /// Lexer over the intent word table and every name in `world`.
    pub fn new(world: &World) -> Self {
        let mut lexer = AliasLexer::default();
        for (alias, token) in INTENT_WORDS {
            lexer.add_alias(alias, token.clone());
        }
        for &(alias, value) in QUANTITY_WORDS {
            lexer.add_alias(alias, Token::Quantity { value });
        }
        for generic in world.catalog.generics() {
            let token = match generic.kind {
                ItemKind::Product => {
                    let token = Token::Entity { pid: generic.pid, name: generic.name.clone() };
                    lexer.entities.insert(generic.pid, token.clone());
                    token
                }
                ItemKind::Option => Token::Option { id: generic.pid, name: generic.name.clone() },
            };
            lexer.add_plural_alias(&generic.name, token);
        }
        for (aid, name) in world.attribute_names() {
            let token = Token::Attribute { id: aid, name: name.clone() };
            lexer.attributes.insert(aid, token.clone());
            lexer.add_alias(&name, token);
        }
        for recipe in world.cookbook.option_recipes() {
            lexer.add_alias(&recipe.name, Token::OptionRecipe { rid: recipe.rid, name: recipe.name.clone() });
        }
        lexer
    }

    pub fn add_alias(&mut self, alias: &str, token: Token) {
        let alias = words(alias);
        if !alias.is_empty() {
            self.aliases.push((alias, token));
        }
    }

    fn add_plural_alias(&mut self, alias: &str, token: Token) {
        self.add_alias(&format!("{alias}s"), token.clone());
        self.add_alias(alias, token);
    }

    pub fn add_unit(&mut self, id: UnitId, name: &str) {
        self.add_plural_alias(name, Token::Unit { id, name: name.to_string() });
    }
}

impl Lexer for AliasLexer {
    fn create_graph(&self, text: &str) -> Graph {
        let words = words(text);
        let mut graph = Graph::new(words.len());
        for (start, word) in words.iter().enumerate() {
            graph.add_edge(start, Edge::filler(word));
            if let Ok(value) = word.parse() {
                graph.add_edge(start, Edge::new(Token::Number { value }, 1.0, 1));
            }
            if let Some(&(_, value)) = NUMBER_WORDS.iter().find(|(w, _)| w == word) {
                graph.add_edge(start, Edge::new(Token::Number { value }, 1.0, 1));
            }
            for (alias, token) in &self.aliases {
                if words[start..].starts_with(alias) {
                    graph.add_edge(start, Edge::new(token.clone(), 1.0, alias.len()));
                }
            }
        }
        graph
    }

    fn entity_token(&self, pid: Pid) -> Option<Token> {
        self.entities.get(&pid).cloned()
    }

    fn attribute_token(&self, aid: Aid) -> Option<Token> {
        self.attributes.get(&aid).cloned()
    }
}
