//! Distributing descriptive words among several entities.
//!
//! A run such as `large coffee with milk and a small cone` is split on its
//! entities into gaps:
//!
//! ```text
//! gap0      entity0  gap1                 entity1  gap2
//! [large]   coffee   [with milk and a small]  cone    []
//! ```
//!
//! The first gap can only describe the first entity and the last gap only the
//! last one. Every interior gap is cut once; the words before the cut go to
//! the entity on its left, the rest to the entity on its right. Each
//! combination of interior cuts is one candidate segmentation; the item
//! builders score them and the best one wins.

use crate::{Span, Spanned, TokenType, span_of};

/// One entity and the words attached to it on either side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment<'t> {
    pub left: &'t [Spanned],
    pub entity: &'t Spanned,
    pub right: &'t [Spanned],
}

impl<'t> Segment<'t> {
    pub fn span(&self) -> Span {
        let mut span = self.entity.span;
        if let Some(left) = span_of(self.left) {
            span = span.cover(&left);
        }
        if let Some(right) = span_of(self.right) {
            span = span.cover(&right);
        }
        span
    }
}

/// Entities of `tokens` and the runs between them; there is always one more
/// gap than entities, and gaps never contain an entity.
pub(crate) fn split_on_entities(tokens: &[Spanned]) -> (Vec<&Spanned>, Vec<&[Spanned]>) {
    let mut entities = Vec::new();
    let mut gaps = Vec::new();
    let mut gap_start = 0;
    for (i, spanned) in tokens.iter().enumerate() {
        if spanned.token.token_type() == TokenType::Entity {
            gaps.push(&tokens[gap_start..i]);
            entities.push(spanned);
            gap_start = i + 1;
        }
    }
    gaps.push(&tokens[gap_start..]);
    (entities, gaps)
}

/// Every assignment of cut points to the gaps: the first gap is cut at 0, the
/// last at its full length, interior gaps anywhere in `0..=len`. The last
/// interior gap varies fastest. Fewer than two gaps yields nothing.
pub(crate) fn enumerate_splits(lengths: &[usize]) -> Vec<Vec<usize>> {
    let Some(&last) = lengths.last() else {
        return Vec::new();
    };
    if lengths.len() < 2 {
        return Vec::new();
    }
    let mut splits = vec![0; lengths.len()];
    let last_index = lengths.len() - 1;
    splits[last_index] = last;

    let mut results = Vec::new();
    loop {
        results.push(splits.clone());
        let Some(carry) = (1..last_index).rev().find(|&i| splits[i] < lengths[i]) else {
            return results;
        };
        splits[carry] += 1;
        for later in &mut splits[carry + 1..last_index] {
            *later = 0;
        }
    }
}

/// Segments of one cut-point assignment.
pub(crate) fn segments<'t>(entities: &[&'t Spanned], gaps: &[&'t [Spanned]], splits: &[usize]) -> Vec<Segment<'t>> {
    entities
        .iter()
        .enumerate()
        .map(|(i, &entity)| Segment { left: &gaps[i][splits[i]..], entity, right: &gaps[i + 1][..splits[i + 1]] })
        .collect()
}

/// Every candidate segmentation of `tokens`, in cut-point enumeration order.
pub(crate) fn segmentations(tokens: &[Spanned]) -> Vec<Vec<Segment<'_>>> {
    let (entities, gaps) = split_on_entities(tokens);
    if entities.is_empty() {
        return Vec::new();
    }
    let lengths: Vec<usize> = gaps.iter().map(|g| g.len()).collect();
    enumerate_splits(&lengths).iter().map(|splits| segments(&entities, &gaps, splits)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;
    use proptest::prelude::*;

    fn tokens(entity_mask: &[bool]) -> Vec<Spanned> {
        entity_mask
            .iter()
            .enumerate()
            .map(|(i, &is_entity)| {
                let token = if is_entity {
                    Token::Entity { pid: i as u32, name: format!("e{i}") }
                } else {
                    Token::Attribute { id: i as u32, name: format!("a{i}") }
                };
                Spanned::new(token, Span::new(i, 1))
            })
            .collect()
    }

    #[test]
    fn interior_gap_is_shared_between_neighbors() {
        // a0 E1 a2 a3 E4 a5
        let input = tokens(&[false, true, false, false, true, false]);
        let all = segmentations(&input);
        assert_eq!(all.len(), 3);
        let left_of_second: Vec<usize> = all.iter().map(|segs| segs[1].left.len()).collect();
        assert_eq!(left_of_second, vec![2, 1, 0]);
        assert_eq!(all[0][0].span(), Span::new(0, 2));
        assert_eq!(all[2][0].span(), Span::new(0, 4));
        assert_eq!(all[2][1].span(), Span::new(4, 2));
    }

    #[test]
    fn enumeration_order_varies_last_interior_gap_fastest() {
        assert_eq!(
            enumerate_splits(&[1, 1, 1, 2]),
            vec![vec![0, 0, 0, 2], vec![0, 0, 1, 2], vec![0, 1, 0, 2], vec![0, 1, 1, 2]]
        );
        assert_eq!(enumerate_splits(&[3, 4]), vec![vec![0, 4]]);
        assert!(enumerate_splits(&[3]).is_empty());
        assert!(enumerate_splits(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn split_reconstructs_input(mask in proptest::collection::vec(any::<bool>(), 0..12)) {
            let input = tokens(&mask);
            let (entities, gaps) = split_on_entities(&input);
            prop_assert_eq!(gaps.len(), entities.len() + 1);
            prop_assert!(gaps.iter().all(|g| g.iter().all(|s| s.token.token_type() != TokenType::Entity)));

            let mut rethreaded: Vec<Spanned> = gaps[0].to_vec();
            for (entity, gap) in entities.iter().zip(&gaps[1..]) {
                rethreaded.push((*entity).clone());
                rethreaded.extend_from_slice(gap);
            }
            prop_assert_eq!(rethreaded, input);
        }

        #[test]
        fn split_count_is_product_of_interior_choices(lengths in proptest::collection::vec(0usize..4, 2..6)) {
            let splits = enumerate_splits(&lengths);
            let expected: usize = lengths[1..lengths.len() - 1].iter().map(|l| l + 1).product();
            prop_assert_eq!(splits.len(), expected);
            for split in &splits {
                prop_assert_eq!(split[0], 0);
                prop_assert_eq!(split[split.len() - 1], lengths[lengths.len() - 1]);
            }
        }
    }
}
