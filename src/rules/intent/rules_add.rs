use super::Context;
use super::helpers::{best_segmentation, markers, parts, replace, targets, tokens_in};
use crate::rules::items::{build_entity, build_modification};
use crate::world::{ItemInstance, State};
use crate::{Captures, Interpretation, Rule};

type Ctx<'a> = Context<'a>;

pub(super) fn rules<'a>() -> Vec<Rule<Ctx<'a>>> {
    vec![rule_add_move(), rule_add_implicit_target(), rule_add_new_items(), rule_add_implicit_options()]
}

/// "add milk to the latte"
fn rule_add_move<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "add: move options onto target",
        pattern: [
            optional!(tok!(Prologue)),
            optional!(tok!(AddToOrder)),
            tok!(ProductParts0),
            tok!(Preposition),
            tok!(ProductParts1),
        ],
        prod: add_move,
    }
}

/// "add milk to it" (with "it" dropped by the lexer)
fn rule_add_implicit_target<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "add: options onto implicit target",
        pattern: [optional!(tok!(Prologue)), optional!(tok!(AddToOrder)), tok!(ProductParts0), tok!(Preposition)],
        prod: add_implicit,
    }
}

/// "I'd like a large coffee and two cones"
fn rule_add_new_items<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "add: new items",
        pattern: [
            optional!(tok!(Prologue)),
            optional!(tok!(AddToOrder)),
            choose!(tok!(ProductParts1), tok!(ProductPartsN)),
        ],
        prod: add_new_items,
    }
}

/// "and whipped cream"
fn rule_add_implicit_options<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "add: options onto last item",
        pattern: [optional!(tok!(Prologue)), optional!(tok!(AddToOrder)), tok!(ProductParts0)],
        prod: add_implicit,
    }
}

fn add_move<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let options = parts(captures[2])?;
    for target in targets(ctx, captures[4]) {
        let Some(item) = &target.item else {
            continue;
        };
        let modified = build_modification(ctx.services, item, options);
        if let Some(updated) = modified.item {
            let score = markers(captures) + target.score + modified.score;
            return Some(ctx.apply(replace(updated, score, tokens_in(captures))));
        }
    }
    None
}

fn add_implicit<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let options = parts(captures[2])?;
    let last = ctx.state.cart.last()?;
    let modified = build_modification(ctx.services, last, options);
    let updated = modified.item?;
    Some(ctx.apply(replace(updated, markers(captures) + modified.score, tokens_in(captures))))
}

fn add_new_items<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let tokens = parts(captures[2])?;
    let (items, score) = best_segmentation(tokens, |segments| {
        let built: Vec<_> = segments.iter().map(|segment| build_entity(ctx.services, segment)).collect();
        let score: usize = built.iter().map(|h| h.score).sum();
        let items: Vec<ItemInstance> = built.into_iter().filter_map(|h| h.item).collect();
        (!items.is_empty()).then_some((items, score))
    })?;
    let interpretation = Interpretation::new(markers(captures) + score, tokens_in(captures), move |state: &State| {
        let cart = items.iter().fold(state.cart.clone(), |cart, item| cart.add(item.clone()));
        State::with_cart(cart)
    });
    Some(ctx.apply(interpretation))
}
