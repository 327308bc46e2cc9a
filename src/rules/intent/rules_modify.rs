use super::Context;
use super::helpers::{best_segmentation, markers, parts, replace, single_segment, targets, tokens_in};
use crate::engine::resolve_targets;
use crate::rules::items::{build_modification, build_replacement};
use crate::{Captures, Rule};

type Ctx<'a> = Context<'a>;

pub(super) fn rules<'a>() -> Vec<Rule<Ctx<'a>>> {
    vec![rule_modify_target(), rule_modify_implicit(), rule_replace(), rule_replace_single_group(), rule_modify_in_place()]
}

/// "change the coffee to decaf"
fn rule_modify_target<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "modify: target",
        pattern: [
            optional!(tok!(Prologue)),
            tok!(ModifyItem),
            optional!(tok!(Preposition)),
            tok!(ProductParts1),
            tok!(Preposition),
            tok!(ProductParts0),
        ],
        prod: modify_target,
    }
}

/// "make it large"
fn rule_modify_implicit<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "modify: most recent item",
        pattern: [optional!(tok!(Prologue)), tok!(ModifyItem), optional!(tok!(Preposition)), tok!(ProductParts0)],
        prod: modify_implicit,
    }
}

/// "change the coffee to a latte"
fn rule_replace<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "modify: replace target",
        pattern: [
            optional!(tok!(Prologue)),
            tok!(ModifyItem),
            optional!(tok!(Preposition)),
            tok!(ProductParts1),
            optional!(tok!(Preposition)),
            tok!(ProductParts1),
        ],
        prod: replace_target,
    }
}

/// "swap the cone and a latte", where the conjunction left one group
fn rule_replace_single_group<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "modify: replace within one group",
        pattern: [optional!(tok!(Prologue)), tok!(ModifyItem), optional!(tok!(Preposition)), tok!(ProductPartsN)],
        prod: replace_single_group,
    }
}

/// "make the coffee large": the entity names the target, the rest is new
fn rule_modify_in_place<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "modify: target in place",
        pattern: [optional!(tok!(Prologue)), tok!(ModifyItem), optional!(tok!(Preposition)), tok!(ProductParts1)],
        prod: modify_in_place,
    }
}

fn modify_target<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let changes = parts(captures[5])?;
    targets(ctx, captures[3]).iter().find_map(|target| {
        let modified = build_modification(ctx.services, target.item.as_ref()?, changes);
        let score = markers(captures) + target.score + modified.score;
        Some(ctx.apply(replace(modified.item?, score, tokens_in(captures))))
    })
}

fn modify_implicit<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let changes = parts(captures[3])?;
    let last = ctx.state.cart.last()?;
    let modified = build_modification(ctx.services, last, changes);
    let score = markers(captures) + modified.score;
    Some(ctx.apply(replace(modified.item?, score, tokens_in(captures))))
}

fn replace_target<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let segment = single_segment(parts(captures[5])?)?;
    targets(ctx, captures[3]).iter().find_map(|target| {
        let replacement = build_replacement(ctx.services, target.item.as_ref()?, &segment);
        let score = markers(captures) + target.score + replacement.score;
        Some(ctx.apply(replace(replacement.item?, score, tokens_in(captures))))
    })
}

fn replace_single_group<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let tokens = parts(captures[3])?;
    let (replacement, score) = best_segmentation(tokens, |segments| {
        let [old, new] = segments else {
            return None;
        };
        resolve_targets(ctx.services, &ctx.state.cart, old.span()).iter().find_map(|target| {
            let replacement = build_replacement(ctx.services, target.item.as_ref()?, new);
            Some((replacement.item?, target.score + replacement.score))
        })
    })?;
    Some(ctx.apply(replace(replacement, markers(captures) + score, tokens_in(captures))))
}

fn modify_in_place<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, _: usize) -> Option<Ctx<'a>> {
    let segment = single_segment(parts(captures[3])?)?;
    let mut changes = segment.left.to_vec();
    changes.extend_from_slice(segment.right);
    resolve_targets(ctx.services, &ctx.state.cart, segment.entity.span).iter().find_map(|target| {
        let modified = build_modification(ctx.services, target.item.as_ref()?, &changes);
        let score = markers(captures) + target.score + modified.score;
        Some(ctx.apply(replace(modified.item?, score, tokens_in(captures))))
    })
}
