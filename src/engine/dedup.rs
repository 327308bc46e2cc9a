//! Deduplication keys for lattice edges.
//!
//! A lexer may propose the same reading of the same words several times (an
//! alias and its plural, or two fuzzy matches of different quality). Only the
//! best-scoring copy is kept, otherwise every duplicate multiplies the number
//! of tokenizations the orchestrator has to run.
//!
//! Two edges are the same when they start at the same position, cover the
//! same number of words, and carry the same token identity. Identity ignores
//! display names: `ENTITY(cone)` and `ENTITY(cones)` with one pid are one
//! reading.

use crate::{Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct EdgeKey {
    pub(crate) start: usize,
    pub(crate) length: usize,
    pub(crate) identity: TokenIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TokenIdentity {
    Bare(TokenType),
    Id(TokenType, u32),
    Text(String),
}

impl EdgeKey {
    pub(crate) fn new(start: usize, length: usize, token: &Token) -> Self {
        let ty = token.token_type();
        let identity = match token {
            Token::Attribute { id, .. } | Token::Option { id, .. } | Token::Unit { id, .. } => {
                TokenIdentity::Id(ty, *id)
            }
            Token::Entity { pid, .. } => TokenIdentity::Id(ty, *pid),
            Token::OptionRecipe { rid, .. } | Token::ProductRecipe { rid, .. } => TokenIdentity::Id(ty, *rid),
            Token::Number { value } | Token::Quantity { value } => TokenIdentity::Id(ty, *value),
            Token::Unknown { text } => TokenIdentity::Text(text.clone()),
            _ => TokenIdentity::Bare(ty),
        };
        EdgeKey { start, length, identity }
    }
}
