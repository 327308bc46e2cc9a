extern crate self as short_order;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod rules;
pub mod world;

pub use api::{
    CandidateSummary, InterpretDetails, InterpretResult, InterpretResultVerbose, Options, interpret, interpret_graph,
    interpret_tokens, interpret_verbose_with, interpret_with,
};
pub use engine::{Edge, Graph};
pub use error::DataError;

use crate::world::State;

/// Generic product (or option) identifier.
pub type Pid = u32;
/// Attribute identifier.
pub type Aid = u32;
/// Dimension identifier.
pub type Did = u32;
/// Matrix identifier.
pub type Mid = u32;
/// Recipe identifier.
pub type Rid = u32;
/// Unit-of-measure identifier.
pub type UnitId = u32;
/// Cart item instance identifier. `0` means "not yet placed in a cart".
pub type Uid = u32;

// --- Tokens -----------------------------------------------------------------

/// Discriminant of a [`Token`]. Grammar patterns match on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    AddToOrder,
    RemoveItem,
    ModifyItem,
    Prologue,
    Preposition,
    Conjunction,
    Attribute,
    Entity,
    Option,
    OptionRecipe,
    ProductRecipe,
    Number,
    Quantity,
    Unit,
    ProductParts0,
    ProductParts1,
    ProductPartsN,
    Unknown,
}

impl TokenType {
    pub const ALL: [TokenType; 18] = [
        TokenType::AddToOrder,
        TokenType::RemoveItem,
        TokenType::ModifyItem,
        TokenType::Prologue,
        TokenType::Preposition,
        TokenType::Conjunction,
        TokenType::Attribute,
        TokenType::Entity,
        TokenType::Option,
        TokenType::OptionRecipe,
        TokenType::ProductRecipe,
        TokenType::Number,
        TokenType::Quantity,
        TokenType::Unit,
        TokenType::ProductParts0,
        TokenType::ProductParts1,
        TokenType::ProductPartsN,
        TokenType::Unknown,
    ];
}

/// A lexical token with its payload.
///
/// The `ProductParts*` variants are synthetic: they are produced by the
/// grouping pass from a run of product-part tokens and carry that run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    AddToOrder,
    RemoveItem,
    ModifyItem,
    Prologue,
    Preposition,
    Conjunction,
    Attribute { id: Aid, name: String },
    Entity { pid: Pid, name: String },
    Option { id: Pid, name: String },
    OptionRecipe { rid: Rid, name: String },
    ProductRecipe { rid: Rid, name: String },
    Number { value: u32 },
    Quantity { value: u32 },
    Unit { id: UnitId, name: String },
    ProductParts0(Vec<Spanned>),
    ProductParts1(Vec<Spanned>),
    ProductPartsN(Vec<Spanned>),
    /// Lexer filler for a word that matched nothing.
    Unknown { text: String },
}

impl Token {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::AddToOrder => TokenType::AddToOrder,
            Token::RemoveItem => TokenType::RemoveItem,
            Token::ModifyItem => TokenType::ModifyItem,
            Token::Prologue => TokenType::Prologue,
            Token::Preposition => TokenType::Preposition,
            Token::Conjunction => TokenType::Conjunction,
            Token::Attribute { .. } => TokenType::Attribute,
            Token::Entity { .. } => TokenType::Entity,
            Token::Option { .. } => TokenType::Option,
            Token::OptionRecipe { .. } => TokenType::OptionRecipe,
            Token::ProductRecipe { .. } => TokenType::ProductRecipe,
            Token::Number { .. } => TokenType::Number,
            Token::Quantity { .. } => TokenType::Quantity,
            Token::Unit { .. } => TokenType::Unit,
            Token::ProductParts0(_) => TokenType::ProductParts0,
            Token::ProductParts1(_) => TokenType::ProductParts1,
            Token::ProductPartsN(_) => TokenType::ProductPartsN,
            Token::Unknown { .. } => TokenType::Unknown,
        }
    }

    /// True for tokens the grouping pass folds into a `ProductParts*` run.
    pub fn is_product_part(&self) -> bool {
        matches!(
            self,
            Token::Attribute { .. }
                | Token::Conjunction
                | Token::Entity { .. }
                | Token::Number { .. }
                | Token::Option { .. }
                | Token::OptionRecipe { .. }
                | Token::ProductRecipe { .. }
                | Token::Quantity { .. }
                | Token::Unit { .. }
        )
    }

    /// The grouped run of a `ProductParts*` token.
    pub fn parts(&self) -> Option<&[Spanned]> {
        match self {
            Token::ProductParts0(parts) | Token::ProductParts1(parts) | Token::ProductPartsN(parts) => Some(parts),
            _ => None,
        }
    }

    /// Short human-readable rendering used in traces and reports.
    pub fn describe(&self) -> String {
        match self {
            Token::AddToOrder => "ADD_TO_ORDER".to_string(),
            Token::RemoveItem => "REMOVE_ITEM".to_string(),
            Token::ModifyItem => "MODIFY_ITEM".to_string(),
            Token::Prologue => "PROLOGUE".to_string(),
            Token::Preposition => "PREPOSITION".to_string(),
            Token::Conjunction => "CONJUNCTION".to_string(),
            Token::Attribute { name, .. } => format!("ATTRIBUTE({name})"),
            Token::Entity { name, .. } => format!("ENTITY({name})"),
            Token::Option { name, .. } => format!("OPTION({name})"),
            Token::OptionRecipe { name, .. } => format!("OPTION_RECIPE({name})"),
            Token::ProductRecipe { name, .. } => format!("PRODUCT_RECIPE({name})"),
            Token::Number { value } => format!("NUMBER({value})"),
            Token::Quantity { value } => format!("QUANTITY({value})"),
            Token::Unit { name, .. } => format!("UNIT({name})"),
            Token::ProductParts0(parts) => format!("PRODUCT_PARTS_0[{}]", describe_all(parts)),
            Token::ProductParts1(parts) => format!("PRODUCT_PARTS_1[{}]", describe_all(parts)),
            Token::ProductPartsN(parts) => format!("PRODUCT_PARTS_N[{}]", describe_all(parts)),
            Token::Unknown { text } => format!("UNKNOWN({text})"),
        }
    }
}

pub(crate) fn describe_all(tokens: &[Spanned]) -> String {
    tokens.iter().map(|s| s.token.describe()).collect::<Vec<_>>().join(" ")
}

/// Position range of a token in the utterance lattice, in word positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Span { start, length }
    }

    /// End position (exclusive).
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span { start, length: end - start }
    }
}

/// A token placed in a tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

impl Spanned {
    pub fn new(token: Token, span: Span) -> Self {
        Spanned { token, span }
    }

    /// Number of lexical tokens this token stands for (grouped runs count their members).
    pub fn token_count(&self) -> usize {
        self.token.parts().map_or(1, <[Spanned]>::len)
    }
}

/// Span covering a non-empty run of tokens.
pub(crate) fn span_of(tokens: &[Spanned]) -> Option<Span> {
    let first = tokens.first()?;
    Some(tokens.iter().skip(1).fold(first.span, |acc, s| acc.cover(&s.span)))
}

// --- Grammar primitives -----------------------------------------------------

/// One element of a rule's pattern.
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// Consume one token whose type satisfies the grammar's equality predicate.
    Token(TokenType),
    /// Try the inner sequence; on failure restore and capture nothing.
    Optional(Vec<Pattern>),
    /// Try each alternative in order; the first that matches wins.
    Choose(Vec<Pattern>),
}

impl Pattern {
    /// Number of capture slots this element fills.
    pub fn slots(&self) -> usize {
        match self {
            Pattern::Token(_) => 1,
            Pattern::Optional(inner) => inner.iter().map(Pattern::slots).sum(),
            Pattern::Choose(alternatives) => alternatives.iter().map(Pattern::slots).max().unwrap_or(0),
        }
    }
}

/// Values captured by a rule match, one slot per `Pattern::Token` position.
pub(crate) type Captures<'t> = [Option<&'t Spanned>];

/// Runs on a full match. Receives the context, the captures and the number of
/// tokens consumed. `None` means "matched but not usable"; the tokens stay consumed.
pub(crate) type Production<C> = fn(&C, &Captures<'_>, usize) -> Option<C>;

/// Extra acceptance test over the captures. A failing guard makes the rule
/// not match, so the next rule is tried at the same position.
pub(crate) type Guard<C> = fn(&C, &Captures<'_>) -> bool;

/// A grammar rule: a name, a positional pattern and a production.
pub(crate) struct Rule<C> {
    pub name: &'static str,
    pub pattern: Vec<Pattern>,
    pub guard: Option<Guard<C>>,
    pub production: Production<C>,
}

impl<C> Rule<C> {
    pub fn slots(&self) -> usize {
        self.pattern.iter().map(Pattern::slots).sum()
    }
}

impl<C> std::fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("guard", &self.guard.is_some())
            .field("production", &"<function>")
            .finish()
    }
}

// --- Scored results ---------------------------------------------------------

/// A scored candidate produced by an item builder. `item` is `None` when
/// construction failed (for example the attribute combination is not a SKU).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hypothetical<T> {
    pub item: Option<T>,
    pub score: usize,
    pub token_count: usize,
}

impl<T> Hypothetical<T> {
    pub fn some(item: T, score: usize, token_count: usize) -> Self {
        Hypothetical { item: Some(item), score, token_count }
    }

    pub fn none(token_count: usize) -> Self {
        Hypothetical { item: None, score: 0, token_count }
    }
}

pub(crate) type HypotheticalItem = Hypothetical<world::ItemInstance>;

type Action = Box<dyn Fn(&State) -> State>;

/// A scored, deferred edit of the order state.
///
/// The action is pure and is never applied until a winner is chosen.
pub struct Interpretation {
    pub score: usize,
    pub token_count: usize,
    action: Action,
}

impl Interpretation {
    pub fn new(score: usize, token_count: usize, action: impl Fn(&State) -> State + 'static) -> Self {
        Interpretation { score, token_count, action: Box::new(action) }
    }

    /// The "nothing understood" interpretation.
    pub fn nop() -> Self {
        Interpretation::new(0, 0, State::clone)
    }

    pub fn is_nop(&self) -> bool {
        self.score == 0
    }

    pub fn apply(&self, state: &State) -> State {
        (self.action)(state)
    }
}

impl std::fmt::Debug for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpretation")
            .field("score", &self.score)
            .field("token_count", &self.token_count)
            .field("action", &"<function>")
            .finish()
    }
}
