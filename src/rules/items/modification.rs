use super::{PartsContext, merge_options, token_count};
use crate::rules::Services;
use crate::world::ItemInstance;
use crate::{Hypothetical, HypotheticalItem, Spanned};

/// Apply new words to an existing item.
///
/// New attributes override the old ones only on the dimensions they name;
/// options merge into the existing children; a quantity replaces the old one.
/// The item keeps its `uid`. Nothing usable in `tokens` gives an absent item.
pub(crate) fn build_modification(services: &Services<'_>, item: &ItemInstance, tokens: &[Spanned]) -> HypotheticalItem {
    let count = token_count(tokens);
    let world = services.world;
    let Some(matrix) = world.matrix_for(item.key.pid) else {
        return Hypothetical::none(count);
    };
    let parts = services.parts.process_left(PartsContext::new(world, Some(matrix)), tokens);
    if parts.used == 0 {
        return Hypothetical::none(count);
    }

    // First selection per dimension wins, so new attributes go first.
    let mut attributes = parts.attributes.clone();
    attributes.extend(matrix.attributes(item.key.index));
    let key = matrix.get_key(item.key.pid, &attributes);
    if !world.catalog.has_key(&key) {
        return Hypothetical::none(count);
    }

    let (children, rejected) = merge_options(world, &key, item.children.clone(), &parts.parts);
    let score = parts.used.saturating_sub(rejected);
    if score == 0 {
        return Hypothetical::none(count);
    }
    let modified = ItemInstance { uid: item.uid, key, quantity: parts.quantity.unwrap_or(item.quantity), children };
    Hypothetical::some(modified, score, count)
}
