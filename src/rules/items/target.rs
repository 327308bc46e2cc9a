use super::{PartsContext, token_count};
use crate::engine::Segment;
use crate::rules::Services;
use crate::world::{ItemInstance, KeyPattern};
use crate::{Hypothetical, Pid, Token};

/// Description of an existing cart item: a wildcard key plus the options the
/// item must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub pattern: KeyPattern,
    pub options: Vec<Pid>,
}

impl Target {
    pub fn matches(&self, item: &ItemInstance) -> bool {
        self.pattern.matches(&item.key) && self.carries_options(item)
    }

    pub fn carries_options(&self, item: &ItemInstance) -> bool {
        self.options.iter().all(|pid| item.children.iter().any(|c| c.key.pid == *pid && c.quantity > 0))
    }
}

/// Read a segment as a reference to something already ordered. Dimensions
/// the words leave open match any value; menu rules are not consulted since
/// the key is not concrete.
pub(crate) fn build_target(services: &Services<'_>, segment: &Segment<'_>) -> Hypothetical<Target> {
    let tokens = token_count(segment.left) + 1 + token_count(segment.right);
    let Token::Entity { pid, .. } = segment.entity.token else {
        return Hypothetical::none(tokens);
    };
    let world = services.world;
    let parts = services.parts.run(PartsContext::anchored(world, pid), segment.left, segment.right);
    let Some(pattern) = world.pattern_for(pid, &parts.attributes) else {
        return Hypothetical::none(tokens);
    };
    let options = parts.options().map(|o| o.pid).collect();
    Hypothetical::some(Target { pattern, options }, 1 + parts.used, tokens)
}
