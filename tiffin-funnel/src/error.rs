//! Failure vocabulary for the funnel.

use thiserror::Error;
use tiffin_session::SessionError;

use crate::flow::FlowStage;

/// Errors produced while driving the funnel.
///
/// The stage-specific variants exist so that a caller can tell "the
/// page did not cooperate at step X" apart from transport-level
/// trouble, which always arrives as [`FunnelError::Session`].
#[derive(Debug, Error)]
pub enum FunnelError {
    /// Every strategy for a target came up empty.
    #[error("no element matched any strategy for {target}")]
    NotFound { target: String },

    /// A page condition did not hold before its deadline.
    #[error("condition not satisfied within {waited_ms} ms: {condition}")]
    Timeout { condition: String, waited_ms: u64 },

    /// A stage method was called out of order.
    #[error("{method} requires stage {expected}, but the flow is at {actual}")]
    InvalidState {
        method: &'static str,
        expected: FlowStage,
        actual: FlowStage,
    },

    #[error("location input not found")]
    LocationInputNotFound,

    #[error("no suggestion appeared for location {query:?}")]
    SuggestionNotFound { query: String },

    #[error("dining entry point not found")]
    DiningLinkNotFound,

    #[error("online order tab not found")]
    TabNotFound,

    #[error("restaurant {name:?} not found in the listing")]
    RestaurantNotFound { name: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}
