use super::{PartsContext, merge_options, token_count};
use crate::engine::Segment;
use crate::rules::Services;
use crate::world::ItemInstance;
use crate::{Hypothetical, HypotheticalItem, Token};

/// Replace `target` with the item described by `segment`.
///
/// The replacement keeps the target's `uid`, takes the target's attributes on
/// every dimension the new words leave open (where the new matrix has that
/// dimension), and keeps its quantity unless a new one is given. Without new
/// options, the target's children carry over where the menu allows them on
/// the new item; with new options, those options are the children.
pub(crate) fn build_replacement(
    services: &Services<'_>,
    target: &ItemInstance,
    segment: &Segment<'_>,
) -> HypotheticalItem {
    let tokens = token_count(segment.left) + 1 + token_count(segment.right);
    let Token::Entity { pid, .. } = segment.entity.token else {
        return Hypothetical::none(tokens);
    };
    let world = services.world;
    let Some(matrix) = world.matrix_for(pid) else {
        return Hypothetical::none(tokens);
    };
    let parts = services.parts.run(PartsContext::new(world, Some(matrix)), segment.left, segment.right);

    let mut attributes = parts.attributes.clone();
    attributes.extend(world.attributes_of(&target.key));
    let key = matrix.get_key(pid, &attributes);
    if !world.catalog.has_key(&key) {
        return Hypothetical::none(tokens);
    }

    let (children, rejected) = if parts.parts.is_empty() {
        let inherited = target.children.iter().filter(|c| world.rules.is_valid_child(&key, &c.key)).cloned().collect();
        (inherited, 0)
    } else {
        merge_options(world, &key, Vec::new(), &parts.parts)
    };
    let replacement =
        ItemInstance { uid: target.uid, key, quantity: parts.quantity.unwrap_or(target.quantity), children };
    Hypothetical::some(replacement, (1 + parts.used).saturating_sub(rejected), tokens)
}
