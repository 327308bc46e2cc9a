//! Span grouping: folds runs of product-part tokens into one
//! `PRODUCT_PARTS_*` token so the intent grammar can match whole item
//! descriptions with a single pattern element.
//!
//! ```text
//! ADD  NUMBER(2)  ATTRIBUTE(large)  ENTITY(latte)  PREP  ENTITY(cone)
//! ADD  PRODUCT_PARTS_1[..........................]  PREP  PRODUCT_PARTS_1[..]
//! ```
//!
//! The suffix counts the entities in the run: `0`, `1`, or `N` for several.
//! A run made only of conjunctions is left alone. `UNKNOWN` fillers are
//! dropped; they explain nothing.

use crate::{Spanned, Token, TokenType, span_of};

pub(crate) fn group(tokens: &[Spanned]) -> Vec<Spanned> {
    let mut grouped = Vec::with_capacity(tokens.len());
    let mut run: Vec<Spanned> = Vec::new();
    for spanned in tokens.iter().filter(|s| s.token.token_type() != TokenType::Unknown) {
        if spanned.token.is_product_part() {
            run.push(spanned.clone());
        } else {
            flush(&mut run, &mut grouped);
            grouped.push(spanned.clone());
        }
    }
    flush(&mut run, &mut grouped);
    grouped
}

fn flush(run: &mut Vec<Spanned>, grouped: &mut Vec<Spanned>) {
    if run.is_empty() {
        return;
    }
    let parts = std::mem::take(run);
    if parts.iter().all(|s| s.token == Token::Conjunction) {
        grouped.extend(parts);
        return;
    }
    let Some(span) = span_of(&parts) else {
        return;
    };
    let entities = parts.iter().filter(|s| s.token.token_type() == TokenType::Entity).count();
    let token = match entities {
        0 => Token::ProductParts0(parts),
        1 => Token::ProductParts1(parts),
        _ => Token::ProductPartsN(parts),
    };
    grouped.push(Spanned::new(token, span));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    fn at(tokens: Vec<Token>) -> Vec<Spanned> {
        tokens.into_iter().enumerate().map(|(i, t)| Spanned::new(t, Span::new(i, 1))).collect()
    }

    fn cone() -> Token {
        Token::Entity { pid: 9000, name: "cone".into() }
    }

    #[test]
    fn groups_runs_by_entity_count() {
        let input = at(vec![
            Token::AddToOrder,
            Token::Number { value: 2 },
            cone(),
            Token::Conjunction,
            cone(),
            Token::Preposition,
            Token::Option { id: 1, name: "milk".into() },
            Token::Unknown { text: "please".into() },
        ]);
        let grouped = group(&input);
        let types: Vec<TokenType> = grouped.iter().map(|s| s.token.token_type()).collect();
        assert_eq!(
            types,
            vec![TokenType::AddToOrder, TokenType::ProductPartsN, TokenType::Preposition, TokenType::ProductParts0]
        );
        assert_eq!(grouped[1].span, Span::new(1, 4));
        assert_eq!(grouped[1].token_count(), 4);
    }

    #[test]
    fn lone_conjunctions_stay_ungrouped() {
        let grouped = group(&at(vec![Token::RemoveItem, Token::Conjunction, Token::ModifyItem, cone()]));
        let types: Vec<TokenType> = grouped.iter().map(|s| s.token.token_type()).collect();
        assert_eq!(
            types,
            vec![TokenType::RemoveItem, TokenType::Conjunction, TokenType::ModifyItem, TokenType::ProductParts1]
        );
    }
}
