use super::{PartsContext, merge_options, token_count};
use crate::engine::Segment;
use crate::rules::Services;
use crate::world::ItemInstance;
use crate::{Hypothetical, HypotheticalItem, Token};

/// Build a new item from one segment: its entity plus the words around it.
///
/// The item is absent (score 0) when the attributes select a SKU the menu
/// does not sell.
pub(crate) fn build_entity(services: &Services<'_>, segment: &Segment<'_>) -> HypotheticalItem {
    let tokens = token_count(segment.left) + 1 + token_count(segment.right);
    let Token::Entity { pid, .. } = segment.entity.token else {
        return Hypothetical::none(tokens);
    };
    let world = services.world;
    let Some(matrix) = world.matrix_for(pid) else {
        return Hypothetical::none(tokens);
    };

    let parts = services.parts.run(PartsContext::new(world, Some(matrix)), segment.left, segment.right);
    let key = matrix.get_key(pid, &parts.attributes);
    if !world.catalog.has_key(&key) {
        tracing::debug!(%key, "not on the menu");
        return Hypothetical::none(tokens);
    }

    let (children, rejected) = merge_options(world, &key, Vec::new(), &parts.parts);
    let item = ItemInstance::new(key, parts.quantity.unwrap_or(1)).with_children(children);
    Hypothetical::some(item, (1 + parts.used).saturating_sub(rejected), tokens)
}
