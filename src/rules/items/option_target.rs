use super::{PartsContext, token_count};
use crate::rules::Services;
use crate::world::{ItemInstance, KeyPattern};
use crate::{Hypothetical, Pid, Spanned};

/// A bare option reference, e.g. "the oat milk".
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionTarget {
    pub pid: Pid,
    pub pattern: KeyPattern,
}

impl OptionTarget {
    pub fn matches(&self, child: &ItemInstance) -> bool {
        self.pattern.matches(&child.key)
    }
}

/// Find the single option named by `tokens`. There is no anchor item, so no
/// quantity is read and bare attributes are dropped; more than one option
/// is not a single reference.
pub(crate) fn build_option_target(services: &Services<'_>, tokens: &[Spanned]) -> Hypothetical<OptionTarget> {
    let count = token_count(tokens);
    let world = services.world;
    let parts = services.parts.process_remaining(PartsContext::new(world, None), tokens);
    let mut options = parts.options();
    let (Some(option), None) = (options.next(), options.next()) else {
        return Hypothetical::none(count);
    };
    if parts.parts.len() != 1 {
        return Hypothetical::none(count);
    }
    match world.pattern_for(option.pid, &option.attributes) {
        Some(pattern) => Hypothetical::some(OptionTarget { pid: option.pid, pattern }, parts.used, count),
        None => Hypothetical::none(count),
    }
}
