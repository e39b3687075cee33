//! Error types for merge registration and dispatch.

use crate::value::Kind;
use thiserror::Error;

/// MergeError represents a failure to register, dispatch or mutate.
///
/// Every error is terminal for the enclosing merge call; no partial result
/// is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("no merge rule registered for ({left}, {right})")]
    NoRuleForPair { left: Kind, right: Kind },

    #[error("cannot register a cast for {0}: no registered rule references this kind")]
    UnknownKind(Kind),

    #[error("object is immutable")]
    Immutable,

    #[error("rule {rule} cannot merge a {kind} value")]
    UnexpectedKind { rule: &'static str, kind: Kind },
}

impl MergeError {
    /// Creates a missing-rule error.
    pub fn no_rule_for_pair(left: Kind, right: Kind) -> Self {
        MergeError::NoRuleForPair { left, right }
    }

    /// Creates an error for a rule handed a value it was not written for.
    pub fn unexpected_kind(rule: &'static str, kind: Kind) -> Self {
        MergeError::UnexpectedKind { rule, kind }
    }
}
