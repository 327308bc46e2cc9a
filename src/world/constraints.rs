//! Composition rules: which options may configure which products, and which
//! options are mutually exclusive on the same parent.
//!
//! Rules are keyed by matcher expressions:
//!
//! ```text
//! "*"          any parent
//! "9000"       every SKU of generic 9000
//! "9000:4"     exactly SKU 9000:4
//! ```

use super::attributes::Key;
use crate::{DataError, Pid};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatcher {
    Any,
    Generic(Pid),
    Exact(Key),
}

impl KeyMatcher {
    pub fn parse(expression: &str) -> Result<Self, DataError> {
        let unknown = || DataError::UnknownMatcher(expression.to_string());
        let expression = expression.trim();
        if expression == "*" {
            return Ok(KeyMatcher::Any);
        }
        match expression.split_once(':') {
            None => expression.parse().map(KeyMatcher::Generic).map_err(|_| unknown()),
            Some((pid, index)) => {
                let pid = pid.parse().map_err(|_| unknown())?;
                let index = index.parse().map_err(|_| unknown())?;
                Ok(KeyMatcher::Exact(Key::new(pid, index)))
            }
        }
    }

    pub fn matches(&self, key: &Key) -> bool {
        match self {
            KeyMatcher::Any => true,
            KeyMatcher::Generic(pid) => key.pid == *pid,
            KeyMatcher::Exact(exact) => exact == key,
        }
    }
}

impl FromStr for KeyMatcher {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyMatcher::parse(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleChecker {
    children: Vec<(KeyMatcher, HashSet<Pid>)>,
    exclusions: Vec<(KeyMatcher, HashSet<Pid>)>,
}

impl RuleChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_children(&mut self, parent: &str, children: &[Pid]) -> Result<(), DataError> {
        let matcher = KeyMatcher::parse(parent)?;
        self.children.push((matcher, children.iter().copied().collect()));
        Ok(())
    }

    pub fn add_exclusion_set(&mut self, parent: &str, members: &[Pid]) -> Result<(), DataError> {
        let matcher = KeyMatcher::parse(parent)?;
        self.exclusions.push((matcher, members.iter().copied().collect()));
        Ok(())
    }

    pub fn is_valid_child(&self, parent: &Key, child: &Key) -> bool {
        self.children.iter().any(|(matcher, allowed)| matcher.matches(parent) && allowed.contains(&child.pid))
    }

    fn exclusion_sets<'s>(&'s self, parent: &Key) -> Vec<&'s HashSet<Pid>> {
        self.exclusions.iter().filter(|(matcher, _)| matcher.matches(parent)).map(|(_, set)| set).collect()
    }

    /// Stateful predicate over the options offered to one parent, in order.
    /// Returns false for an option whose exclusion set already has a member.
    pub fn mutual_exclusion_predicate(&self, parent: &Key) -> impl FnMut(&Key) -> bool + '_ {
        let sets = self.exclusion_sets(parent);
        let mut used = vec![false; sets.len()];
        move |child: &Key| {
            let Some(set) = sets.iter().position(|s| s.contains(&child.pid)) else {
                return true;
            };
            if used[set] {
                return false;
            }
            used[set] = true;
            true
        }
    }

    /// True when `a` and `b` cannot both configure `parent`: same generic, or
    /// members of one exclusion set.
    pub fn conflicts(&self, parent: &Key, a: &Key, b: &Key) -> bool {
        a.pid == b.pid || self.exclusion_sets(parent).iter().any(|s| s.contains(&a.pid) && s.contains(&b.pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_matcher_expressions() {
        assert_eq!(KeyMatcher::parse("*"), Ok(KeyMatcher::Any));
        assert_eq!(KeyMatcher::parse("9000"), Ok(KeyMatcher::Generic(9000)));
        assert_eq!(KeyMatcher::parse("9000:4"), Ok(KeyMatcher::Exact(Key::new(9000, 4))));
        assert_eq!(KeyMatcher::parse("latte"), Err(DataError::UnknownMatcher("latte".to_string())));
        assert!("9000:x".parse::<KeyMatcher>().is_err());
    }

    #[test]
    fn exclusion_predicate_admits_one_member_per_set() {
        let mut rules = RuleChecker::new();
        rules.add_exclusion_set("9100", &[5000, 5010]).unwrap();
        let parent = Key::new(9100, 0);
        let mut admit = rules.mutual_exclusion_predicate(&parent);
        assert!(admit(&Key::new(5000, 0)));
        assert!(!admit(&Key::new(5010, 0)));
        assert!(admit(&Key::new(5300, 0)));
        assert!(rules.conflicts(&parent, &Key::new(5000, 1), &Key::new(5010, 0)));
        assert!(!rules.conflicts(&Key::new(9000, 0), &Key::new(5000, 1), &Key::new(5010, 0)));
    }
}
