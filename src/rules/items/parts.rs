use super::{OptionPart, Part, PartsContext};
use crate::{Aid, Captures, Pid, Rule, Spanned, Token};

type Ctx<'a> = PartsContext<'a>;

pub(super) fn rules<'a>() -> Vec<Rule<Ctx<'a>>> {
    vec![rule_conjunction(), rule_option_recipe(), rule_attribute_option(), rule_option(), rule_attribute()]
}

fn rule_conjunction<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "conjunction",
        pattern: [tok!(Conjunction)],
        prod: skip,
    }
}

fn rule_option_recipe<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "option recipe",
        pattern: [tok!(OptionRecipe)],
        prod: option_recipe,
    }
}

fn rule_attribute_option<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "attribute option",
        pattern: [optional!(tok!(Number)), optional!(tok!(Unit)), tok!(Attribute), tok!(Option)],
        when: attribute_configures_option,
        prod: attribute_option,
    }
}

fn rule_option<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "option",
        pattern: [optional!(tok!(Number)), optional!(tok!(Unit)), tok!(Option)],
        prod: option,
    }
}

fn rule_attribute<'a>() -> Rule<Ctx<'a>> {
    rule! {
        name: "attribute",
        pattern: [tok!(Attribute)],
        prod: attribute,
    }
}

fn skip<'a>(ctx: &Ctx<'a>, _: &Captures<'_>, used: usize) -> Option<Ctx<'a>> {
    let mut next = ctx.clone();
    next.used += used;
    Some(next)
}

fn option_recipe<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, used: usize) -> Option<Ctx<'a>> {
    let Token::OptionRecipe { rid, .. } = captures.first().copied().flatten()?.token else {
        return None;
    };
    let mut next = ctx.clone();
    next.parts.push(Part::Recipe { rid, tokens: used });
    next.used += used;
    Some(next)
}

fn number(capture: Option<&Spanned>) -> Option<u32> {
    match capture?.token {
        Token::Number { value } => Some(value),
        _ => None,
    }
}

fn attribute_id(capture: Option<&Spanned>) -> Option<Aid> {
    match capture?.token {
        Token::Attribute { id, .. } => Some(id),
        _ => None,
    }
}

fn option_id(capture: Option<&Spanned>) -> Option<Pid> {
    match capture?.token {
        Token::Option { id, .. } => Some(id),
        _ => None,
    }
}

/// The attribute's dimension is one of the option's dimensions.
fn attribute_configures_option(ctx: &Ctx<'_>, captures: &Captures<'_>) -> bool {
    let (Some(aid), Some(pid)) = (attribute_id(captures[2]), option_id(captures[3])) else {
        return false;
    };
    ctx.world.matrix_for(pid).is_some_and(|m| m.configures(aid))
}

fn attribute_option<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, used: usize) -> Option<Ctx<'a>> {
    let aid = attribute_id(captures[2])?;
    let pid = option_id(captures[3])?;
    Some(with_option(ctx, pid, vec![aid], number(captures[0]), used))
}

fn option<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, used: usize) -> Option<Ctx<'a>> {
    let pid = option_id(captures[2])?;
    Some(with_option(ctx, pid, Vec::new(), number(captures[0]), used))
}

fn with_option<'a>(ctx: &Ctx<'a>, pid: Pid, attributes: Vec<Aid>, quantity: Option<u32>, used: usize) -> Ctx<'a> {
    let mut next = ctx.clone();
    next.parts.push(Part::Option(OptionPart { pid, attributes, quantity: quantity.unwrap_or(1), tokens: used }));
    next.used += used;
    next
}

/// Accept an attribute for the anchor, at most one per dimension. Anything
/// else is consumed and dropped.
fn attribute<'a>(ctx: &Ctx<'a>, captures: &Captures<'_>, used: usize) -> Option<Ctx<'a>> {
    let aid = attribute_id(captures[0])?;
    let matrix = ctx.matrix?;
    if !matrix.configures(aid) {
        return None;
    }
    let did = ctx.world.attributes.dimension_of(aid)?;
    if ctx.dimensions.contains(&did) {
        return None;
    }
    let mut next = ctx.clone();
    next.attributes.push(aid);
    next.dimensions.push(did);
    next.used += used;
    Some(next)
}
