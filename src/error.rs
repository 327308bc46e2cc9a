//! Errors raised while authoring the menu knowledge base.
//!
//! Interpretation itself never fails: an utterance that cannot be understood
//! yields a nop interpretation. These errors surface while building a
//! [`World`](crate::world::World) from bad data.

use crate::{Aid, Did, Mid, Pid, Rid};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("duplicate dimension id {0}")]
    DuplicateDimension(Did),

    #[error("duplicate matrix id {0}")]
    DuplicateMatrix(Mid),

    #[error("duplicate entity id {0}")]
    DuplicateEntity(Pid),

    #[error("attribute {aid} already belongs to dimension {existing}")]
    DuplicateAttribute { aid: Aid, existing: Did },

    #[error("duplicate recipe id {0}")]
    DuplicateRecipe(Rid),

    #[error("unknown dimension id {0}")]
    UnknownDimension(Did),

    #[error("unknown matrix id {0}")]
    UnknownMatrix(Mid),

    #[error("dimension {did} must have exactly one default attribute, found {found}")]
    BadDefault { did: Did, found: usize },

    #[error("unknown matcher expression '{0}'")]
    UnknownMatcher(String),
}
