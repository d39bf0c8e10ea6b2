//! Errors raised while building or walking a node tree.
//!
//! Nothing here is recovered locally: construction and both passes are
//! one-shot, so every error propagates to the pipeline driver, which drops
//! the partially built tree.

use jsdown_common::EditError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    /// The value handed to the builder as a root is not a syntax object.
    #[error("raw syntax root is not an object (found {found})")]
    NotANode { found: &'static str },

    /// A syntax object has no usable `type` tag.
    #[error("syntax object at `{key}` has no string `type` tag")]
    MissingType { key: String },

    /// `start`/`end` is missing, not an unsigned integer, or does not fit the
    /// source text.
    #[error("{kind} has an invalid `{field}` offset: {value}")]
    InvalidOffset {
        kind: String,
        field: &'static str,
        value: String,
    },

    /// A tag the registry does not know.
    #[error("unknown syntax kind `{kind}` at offset {start}")]
    UnknownKind { kind: String, start: u32 },

    /// Nesting deeper than the configured maximum.
    #[error("{kind} at offset {start} is nested deeper than {limit} levels")]
    TooDeep { kind: String, start: u32, limit: u32 },

    /// An upward walk reached past the root without finding a match. The
    /// kind hierarchy is missing a terminating boundary.
    #[error("{query} from {from} walked past the root without a match")]
    DelegationExhausted { query: &'static str, from: String },

    /// A kind was registered twice.
    #[error("syntax kind `{0}` is registered twice")]
    DuplicateKind(String),

    /// A kind named in the registry configuration was never registered.
    #[error("{role} kind `{kind}` is not registered")]
    UnregisteredKind { kind: String, role: &'static str },

    /// A pipeline stage ran out of order.
    #[error("cannot {requested} a program that is {state}")]
    PhaseOrder {
        requested: &'static str,
        state: &'static str,
    },

    /// A text edit or slice failed.
    #[error(transparent)]
    Edit(#[from] EditError),
}
