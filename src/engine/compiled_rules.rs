//! Rule compilation and indexing.
//!
//! A grammar is run many times per utterance (once per tokenization, and the
//! item sub-grammars once per gap run), so each rule is indexed once with the
//! token types it cannot match without. A run then skips every rule whose
//! required types are absent from its input (see `trigger.rs`).
//!
//! Only top-level `Pattern::Token` elements count as required: the contents
//! of `optional(..)` and `choose(..)` may be absent.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into the grammar's rule list and into
//!   `CompiledRules::metas`. Those vectors must stay aligned.
//! - Gating never changes which rule wins: it only drops rules that could not
//!   have matched, and `active` preserves declaration order.

use crate::{Pattern, Rule, TokenType};

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Set of token types, used both for rule requirements and for what an
    /// input contains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenMask: u32 {
        const ADD_TO_ORDER    = 1 << TokenType::AddToOrder as u32;
        const REMOVE_ITEM     = 1 << TokenType::RemoveItem as u32;
        const MODIFY_ITEM     = 1 << TokenType::ModifyItem as u32;
        const PROLOGUE        = 1 << TokenType::Prologue as u32;
        const PREPOSITION     = 1 << TokenType::Preposition as u32;
        const CONJUNCTION     = 1 << TokenType::Conjunction as u32;
        const ATTRIBUTE       = 1 << TokenType::Attribute as u32;
        const ENTITY          = 1 << TokenType::Entity as u32;
        const OPTION          = 1 << TokenType::Option as u32;
        const OPTION_RECIPE   = 1 << TokenType::OptionRecipe as u32;
        const PRODUCT_RECIPE  = 1 << TokenType::ProductRecipe as u32;
        const NUMBER          = 1 << TokenType::Number as u32;
        const QUANTITY        = 1 << TokenType::Quantity as u32;
        const UNIT            = 1 << TokenType::Unit as u32;
        const PRODUCT_PARTS_0 = 1 << TokenType::ProductParts0 as u32;
        const PRODUCT_PARTS_1 = 1 << TokenType::ProductParts1 as u32;
        const PRODUCT_PARTS_N = 1 << TokenType::ProductPartsN as u32;
        const UNKNOWN         = 1 << TokenType::Unknown as u32;
    }
}

impl TokenMask {
    pub fn of(ty: TokenType) -> Self {
        TokenMask::from_bits_truncate(1 << ty as u32)
    }
}

/// Metadata derived from a rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleMeta {
    pub name: &'static str,
    /// Token types that must occur in the input for the rule to match.
    pub required: TokenMask,
}

/// Pre-compiled rule metadata, aligned with the grammar's rule list.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub metas: Vec<RuleMeta>,
}

impl CompiledRules {
    pub fn new<C>(rules: &[Rule<C>]) -> Self {
        let metas = rules
            .iter()
            .map(|rule| {
                let required = rule.pattern.iter().fold(TokenMask::empty(), |mask, element| match element {
                    Pattern::Token(ty) => mask | TokenMask::of(*ty),
                    Pattern::Optional(_) | Pattern::Choose(_) => mask,
                });
                RuleMeta { name: rule.name, required }
            })
            .collect();
        CompiledRules { metas }
    }

    /// Rules that may match an input containing `present`, in declaration order.
    pub fn active(&self, present: TokenMask) -> Vec<RuleId> {
        self.metas.iter().enumerate().filter(|(_, meta)| present.contains(meta.required)).map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip<C: Clone>(context: &C, _: &crate::Captures<'_>, _: usize) -> Option<C> {
        Some(context.clone())
    }

    #[test]
    fn required_types_ignore_optional_and_choose() {
        let rules: Vec<Rule<()>> = vec![
            rule! {
                name: "remove",
                pattern: [optional!(tok!(Prologue)), tok!(RemoveItem), choose!(tok!(ProductParts1), tok!(ProductPartsN))],
                prod: skip,
            },
            rule! { name: "any", pattern: [choose!(tok!(Entity), tok!(Option))], prod: skip },
        ];
        let compiled = CompiledRules::new(&rules);
        assert_eq!(compiled.metas[0].required, TokenMask::REMOVE_ITEM);
        assert!(compiled.metas[1].required.is_empty());
        assert_eq!(compiled.active(TokenMask::ENTITY), vec![1]);
        assert_eq!(compiled.active(TokenMask::REMOVE_ITEM | TokenMask::PROLOGUE), vec![0, 1]);
    }
}
