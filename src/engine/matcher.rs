//! Ordered-rule pattern matcher over a token slice.
//!
//! A [`Grammar`] is an ordered list of rules. Processing walks the input left
//! to right; at each position the first rule whose pattern matches wins and
//! its production turns the current context into the next one:
//!
//! ```text
//! loop until end of input:
//!     for rule in active rules (declaration order):
//!         match pattern at cursor ──► no  ──► next rule
//!                                 └─► yes ──► production(ctx, captures, used)
//!                                              Some(next) ─► ctx = next
//!                                              None       ─► ctx unchanged
//!                                              (tokens stay consumed)
//!     no rule matched ──► discard one token
//! ```
//!
//! Every step consumes at least one token: a match that consumes nothing (a
//! pattern made only of `optional(..)` elements that all came up empty) is
//! treated as no match. Processing a finite input therefore always ends.

use super::compiled_rules::{CompiledRules, RuleId};
use super::cursor::Cursor;
use super::trigger::TriggerInfo;
use crate::{Pattern, Rule, Spanned, Token, TokenType};

/// Decides whether a token satisfies a `Pattern::Token` element.
pub(crate) type Equality = fn(TokenType, &Token) -> bool;

pub(crate) fn same_type(expected: TokenType, token: &Token) -> bool {
    token.token_type() == expected
}

pub(crate) struct Grammar<C> {
    name: &'static str,
    rules: Vec<Rule<C>>,
    compiled: CompiledRules,
    equality: Equality,
}

impl<C> Grammar<C> {
    pub fn new(name: &'static str, rules: Vec<Rule<C>>) -> Self {
        Self::with_equality(name, rules, same_type)
    }

    pub fn with_equality(name: &'static str, rules: Vec<Rule<C>>, equality: Equality) -> Self {
        let compiled = CompiledRules::new(&rules);
        Grammar { name, rules, compiled, equality }
    }

    /// Run the grammar over `tokens`, threading `context` through every
    /// production that accepts its match.
    pub fn process(&self, context: C, tokens: &[Spanned]) -> C {
        self.process_with_trace(context, tokens).0
    }

    /// Like [`Grammar::process`], also returning the names of the rules whose
    /// production produced a new context.
    pub fn process_with_trace(&self, context: C, tokens: &[Spanned]) -> (C, Vec<&'static str>) {
        let trigger = TriggerInfo::scan(tokens, self.equality);
        let active = self.compiled.active(trigger.present);
        let mut cursor = Cursor::new(tokens);
        let mut context = context;
        let mut fired = Vec::new();

        while !cursor.at_eos() {
            match self.step(&context, &mut cursor, &active) {
                Step::Produced(next, name) => {
                    context = next;
                    fired.push(name);
                }
                Step::Rejected => {}
                Step::NoMatch => {
                    if let Some(skipped) = cursor.peek() {
                        tracing::trace!(grammar = self.name, token = %skipped.token.describe(), "discard");
                    }
                    cursor.discard();
                }
            }
        }
        (context, fired)
    }

    fn step<'t>(&self, context: &C, cursor: &mut Cursor<'t, Spanned>, active: &[RuleId]) -> Step<C> {
        for &id in active {
            let rule = &self.rules[id];
            let Some((captures, used)) = self.match_rule(rule, context, cursor) else {
                continue;
            };
            return match (rule.production)(context, &captures, used) {
                Some(next) => {
                    tracing::debug!(grammar = self.name, rule = rule.name, used, "rule matched");
                    Step::Produced(next, rule.name)
                }
                None => {
                    tracing::debug!(grammar = self.name, rule = rule.name, used, "rule matched, production declined");
                    Step::Rejected
                }
            };
        }
        Step::NoMatch
    }

    /// Try `rule` at the cursor. On success the cursor is left after the
    /// match; on failure it is where it started.
    fn match_rule<'t>(
        &self,
        rule: &Rule<C>,
        context: &C,
        cursor: &mut Cursor<'t, Spanned>,
    ) -> Option<(Vec<Option<&'t Spanned>>, usize)> {
        let start = cursor.items_used();
        let mut captures = Vec::with_capacity(rule.slots());
        cursor.mark();
        let matched = self.match_sequence(&rule.pattern, cursor, &mut captures)
            && cursor.items_used() > start
            && rule.guard.is_none_or(|guard| guard(context, &captures));
        if matched {
            cursor.commit();
            Some((captures, cursor.items_used() - start))
        } else {
            cursor.restore();
            None
        }
    }

    fn match_sequence<'t>(
        &self,
        elements: &[Pattern],
        cursor: &mut Cursor<'t, Spanned>,
        captures: &mut Vec<Option<&'t Spanned>>,
    ) -> bool {
        elements.iter().all(|element| self.match_element(element, cursor, captures))
    }

    fn match_element<'t>(
        &self,
        element: &Pattern,
        cursor: &mut Cursor<'t, Spanned>,
        captures: &mut Vec<Option<&'t Spanned>>,
    ) -> bool {
        match element {
            Pattern::Token(expected) => match cursor.peek() {
                Some(spanned) if (self.equality)(*expected, &spanned.token) => {
                    captures.push(Some(cursor.take()));
                    true
                }
                _ => false,
            },
            Pattern::Optional(inner) => {
                let filled = captures.len();
                cursor.mark();
                if self.match_sequence(inner, cursor, captures) {
                    cursor.commit();
                } else {
                    cursor.restore();
                    captures.truncate(filled);
                    captures.resize(filled + element.slots(), None);
                }
                true
            }
            Pattern::Choose(alternatives) => {
                let filled = captures.len();
                for alternative in alternatives {
                    cursor.mark();
                    if self.match_element(alternative, cursor, captures) {
                        cursor.commit();
                        captures.resize(filled + element.slots(), None);
                        return true;
                    }
                    cursor.restore();
                    captures.truncate(filled);
                }
                false
            }
        }
    }
}

enum Step<C> {
    Produced(C, &'static str),
    Rejected,
    NoMatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Captures, Span};

    fn spanned(tokens: Vec<Token>) -> Vec<Spanned> {
        tokens.into_iter().enumerate().map(|(i, t)| Spanned::new(t, Span::new(i, 1))).collect()
    }

    /// Records `rule:used:captured-slot-count` per fired rule.
    type Log = Vec<String>;

    fn record(name: &str, log: &Log, captures: &Captures<'_>, used: usize) -> Option<Log> {
        let mut log = log.clone();
        let filled = captures.iter().filter(|c| c.is_some()).count();
        log.push(format!("{name}:{used}:{filled}/{}", captures.len()));
        Some(log)
    }

    fn remove(log: &Log, captures: &Captures<'_>, used: usize) -> Option<Log> {
        record("remove", log, captures, used)
    }

    fn add(log: &Log, captures: &Captures<'_>, used: usize) -> Option<Log> {
        record("add", log, captures, used)
    }

    fn decline(_: &Log, _: &Captures<'_>, _: usize) -> Option<Log> {
        None
    }

    fn grammar() -> Grammar<Log> {
        Grammar::new(
            "test",
            vec![
                rule! {
                    name: "remove",
                    pattern: [optional!(tok!(Prologue)), tok!(RemoveItem), choose!(tok!(Entity), tok!(Option))],
                    prod: remove,
                },
                rule! { name: "add", pattern: [optional!(tok!(AddToOrder)), tok!(Entity)], prod: add },
                rule! { name: "empty", pattern: [optional!(tok!(Conjunction))], prod: decline },
            ],
        )
    }

    #[test]
    fn first_matching_rule_wins_and_optionals_capture_none() {
        let tokens = spanned(vec![
            Token::RemoveItem,
            Token::Option { id: 1, name: "milk".into() },
            Token::AddToOrder,
            Token::Entity { pid: 2, name: "cone".into() },
        ]);
        let log = grammar().process(Vec::new(), &tokens);
        assert_eq!(log, vec!["remove:2:2/3", "add:2:2/2"]);
    }

    #[test]
    fn unmatched_tokens_are_discarded_one_at_a_time() {
        let tokens = spanned(vec![
            Token::Preposition,
            Token::Unknown { text: "um".into() },
            Token::Entity { pid: 2, name: "cone".into() },
        ]);
        let (log, fired) = grammar().process_with_trace(Vec::new(), &tokens);
        assert_eq!(log, vec!["add:1:1/2"]);
        assert_eq!(fired, vec!["add"]);
    }

    #[test]
    fn declined_production_still_consumes_and_empty_match_is_no_match() {
        let g = Grammar::new(
            "decline",
            vec![
                rule! { name: "eat", pattern: [tok!(Conjunction), tok!(Entity)], prod: decline },
                rule! { name: "add", pattern: [tok!(Entity)], prod: add },
                rule! { name: "empty", pattern: [optional!(tok!(Prologue))], prod: add },
            ],
        );
        let tokens = spanned(vec![
            Token::Conjunction,
            Token::Entity { pid: 2, name: "cone".into() },
            Token::Unit { id: 1, name: "pump".into() },
        ]);
        assert!(g.process(Vec::new(), &tokens).is_empty());
    }

    #[test]
    fn guard_failure_falls_through_to_next_rule() {
        fn never(_: &Log, _: &Captures<'_>) -> bool {
            false
        }
        let g = Grammar::new(
            "guarded",
            vec![
                rule! { name: "guarded", pattern: [tok!(Entity)], when: never, prod: remove },
                rule! { name: "add", pattern: [tok!(Entity)], prod: add },
            ],
        );
        let tokens = spanned(vec![Token::Entity { pid: 2, name: "cone".into() }]);
        assert_eq!(g.process(Vec::new(), &tokens), vec!["add:1:1/1"]);
    }
}
