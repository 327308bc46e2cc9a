use super::Context;
use super::helpers::{best_segmentation, markers, parts, replace, targets, tokens_in, without_option};
use crate::engine::{resolve_option_targets, resolve_targets};
use crate::world::{ItemInstance, State};
use crate::{Captures, HypotheticalItem, Interpretation, Rule, Spanned, Uid};

type Ctx<'a> = Context<'a>;

pub(super) fn rules<'a>() -> Vec<Rule<Ctx<'a>>> {
    vec![rule_remove_items(), rule_remove_option_from_target(), rule_remove_option_implicit()]
}

/// "cancel the chocolate cone and the latte"
fn rule_remove_items<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "remove: items",
        pattern: [
            optional!(tok!(Prologue)),
            tok!(RemoveItem),
            choose!(tok!(ProductParts1), tok!(ProductPartsN)),
        ],
        prod: remove_items,
    }
}

/// "take the milk off the latte", read as "take off milk from latte"
fn rule_remove_option_from_target<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "remove: option from target",
        pattern: [
            optional!(tok!(Prologue)),
            tok!(RemoveItem),
            tok!(ProductParts0),
            tok!(Preposition),
            tok!(ProductParts1),
        ],
        prod: remove_option_from_target,
    }
}

/// "no whipped cream"
fn rule_remove_option_implicit<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "remove: option, most recent item",
        pattern: [optional!(tok!(Prologue)), tok!(RemoveItem), tok!(ProductParts0)],
        prod: remove_option_implicit,
    }
}

fn remove_items<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let tokens = parts(captures[2])?;
    let cart = &ctx.state.cart;
    let (uids, score) = best_segmentation(tokens, |segments| {
        let mut uids: Vec<Uid> = Vec::new();
        let mut score = 0;
        for segment in segments {
            let found = resolve_targets(ctx.services, cart, segment.span());
            let fresh = found.into_iter().find(|h| h.item.as_ref().is_some_and(|i| !uids.contains(&i.uid)));
            if let Some(HypotheticalItem { item: Some(item), score: s, .. }) = fresh {
                uids.push(item.uid);
                score += s;
            }
        }
        (!uids.is_empty()).then_some((uids, score))
    })?;
    let interpretation = Interpretation::new(markers(captures) + score, tokens_in(captures), move |state: &State| {
        State::with_cart(uids.iter().fold(state.cart.clone(), |cart, uid| cart.remove(*uid)))
    });
    Some(ctx.apply(interpretation))
}

/// Remove the option named by `words` from `parent`, if it has one.
fn remove_from<'a>(
    ctx: &Ctx<'a>,
    parent: &ItemInstance,
    words: &Spanned,
    score: usize,
    token_count: usize,
) -> Option<Ctx<'a>> {
    let option = resolve_option_targets(ctx.services, parent, words.span).into_iter().next()?;
    let child = option.item?;
    let updated = without_option(ctx.world(), parent, &child);
    Some(ctx.apply(replace(updated, score + option.score, token_count)))
}

fn remove_option_from_target<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let words = captures[2]?;
    targets(ctx, captures[4]).iter().find_map(|target| {
        let parent = target.item.as_ref()?;
        remove_from(ctx, parent, words, markers(captures) + target.score, tokens_in(captures))
    })
}

fn remove_option_implicit<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let words = captures[2]?;
    ctx.state
        .cart
        .items
        .iter()
        .rev()
        .find_map(|parent| remove_from(ctx, parent, words, markers(captures), tokens_in(captures)))
}
