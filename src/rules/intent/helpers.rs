use super::Context;
use crate::engine::{Segment, resolve_targets, segmentations, split_on_entities};
use crate::world::{ItemInstance, State, World};
use crate::{Captures, HypotheticalItem, Interpretation, Spanned};

/// Marker tokens (intent words, prepositions) among the captures.
pub(super) fn markers(captures: &Captures<'_>) -> usize {
    captures.iter().flatten().filter(|s| s.token.parts().is_none()).count()
}

/// Lexical tokens covered by the captures.
pub(super) fn tokens_in(captures: &Captures<'_>) -> usize {
    captures.iter().flatten().map(|s| s.token_count()).sum()
}

/// The run grouped in a `PRODUCT_PARTS_*` capture.
pub(super) fn parts<'t>(capture: Option<&'t Spanned>) -> Option<&'t [Spanned]> {
    capture?.token.parts()
}

/// The only segment of a run holding exactly one entity.
pub(super) fn single_segment(tokens: &[Spanned]) -> Option<Segment<'_>> {
    let (entities, gaps) = split_on_entities(tokens);
    match entities.as_slice() {
        [entity] => Some(Segment { left: gaps[0], entity, right: gaps[1] }),
        _ => None,
    }
}

/// Best-first cart items referred to by a captured run.
pub(super) fn targets(ctx: &Context<'_>, capture: Option<&Spanned>) -> Vec<HypotheticalItem> {
    match capture {
        Some(words) => resolve_targets(ctx.services, &ctx.state.cart, words.span),
        None => Vec::new(),
    }
}

/// Highest-scoring way to read `tokens` as a list of segments, scored by
/// `read`. Ties go to the earlier segmentation.
pub(super) fn best_segmentation<'t, T>(
    tokens: &'t [Spanned],
    mut read: impl FnMut(&[Segment<'t>]) -> Option<(T, usize)>,
) -> Option<(T, usize)> {
    let mut best: Option<(T, usize)> = None;
    for segments in segmentations(tokens) {
        let Some((value, score)) = read(&segments) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((value, score));
        }
    }
    best
}

/// Interpretation replacing the cart item with the same `uid` as `item`.
pub(super) fn replace(item: ItemInstance, score: usize, token_count: usize) -> Interpretation {
    Interpretation::new(score, token_count, move |state: &State| State::with_cart(state.cart.replace(item.clone())))
}

/// `parent` without `option`. A default option is kept with quantity 0 so
/// the removal is recorded; anything else is dropped.
pub(super) fn without_option(world: &World, parent: &ItemInstance, option: &ItemInstance) -> ItemInstance {
    let mut parent = parent.clone();
    if world.catalog.is_default_option(parent.key.pid, option.key.pid) {
        match parent.children.iter_mut().find(|c| option.uid != 0 && c.uid == option.uid) {
            Some(child) => child.quantity = 0,
            None => parent.children.push(ItemInstance { quantity: 0, ..option.clone() }),
        }
    } else {
        parent.children.retain(|c| c.uid != option.uid);
    }
    parent
}
