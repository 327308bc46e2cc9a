//! Trigger scanning (input pre-classification).
//!
//! Computes the set of token types a grammar's equality predicate can see in
//! an input, so that `CompiledRules::active` can drop rules early.
//!
//! The scan asks the predicate rather than reading discriminants directly:
//! a grammar with a looser notion of equality (one type standing in for
//! another) must not lose rules to the gate.

use super::compiled_rules::TokenMask;
use super::matcher::Equality;
use crate::{Spanned, TokenType};

#[derive(Debug, Clone, Copy)]
pub struct TriggerInfo {
    pub present: TokenMask,
}

impl TriggerInfo {
    pub fn scan(tokens: &[Spanned], equality: Equality) -> Self {
        let present = TokenType::ALL
            .iter()
            .filter(|&&ty| tokens.iter().any(|s| equality(ty, &s.token)))
            .fold(TokenMask::empty(), |mask, &ty| mask | TokenMask::of(ty));
        TriggerInfo { present }
    }
}
