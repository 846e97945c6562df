//! Error types for quadbus.
//!
//! Protocol-level outcomes (`Failure`, `NotUnderstood`) are replies, never
//! `Err` values; these types cover the channel layer only: a mailbox that
//! cannot accept a message, a worker that has gone away, or a requester
//! whose wait expired.

use thiserror::Error;

use crate::shape::Shape;

/// Errors raised while handing a message to a store.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The target store's mailbox is at capacity.
    #[error("mailbox for shape {shape} is full (capacity {capacity})")]
    MailboxFull {
        /// Shape of the target store.
        shape: Shape,
        /// Configured mailbox capacity.
        capacity: usize,
    },

    /// The target store's worker has shut down.
    #[error("store for shape {shape} has disconnected")]
    Disconnected {
        /// Shape of the target store.
        shape: Shape,
    },
}

/// Errors raised while waiting on a reply channel.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// No reply arrived within the caller-supplied timeout.
    ///
    /// For a `QueryRef` against an empty store this is the expected,
    /// normal outcome (open-world silence), not a fault.
    #[error("timed out after {duration_ms}ms waiting for a reply")]
    Timeout {
        /// The elapsed wait in milliseconds.
        duration_ms: u64,
    },

    /// Every sender for the reply channel has been dropped.
    #[error("reply channel disconnected")]
    Disconnected,

    /// A reply arrived whose performative the collector cannot interpret.
    #[error("unexpected reply performative: {kind}")]
    UnexpectedReply {
        /// The offending performative's kind name.
        kind: &'static str,
    },
}

/// A store received a pattern of a shape other than its own.
///
/// Correct router dispatch prevents this; a store that does see it rejects
/// the request with `NotUnderstood` instead of touching its map.
#[derive(Debug, Error)]
#[error("pattern shape {got} does not match store shape {expected}")]
pub struct ShapeMismatch {
    /// The store's own shape.
    pub expected: Shape,
    /// The shape of the offending pattern.
    pub got: Shape,
}

/// Top-level error type for quadbus.
#[derive(Debug, Error)]
pub enum BusError {
    /// Channel-layer dispatch failure.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Reply-wait failure.
    #[error("reply error: {0}")]
    Reply(#[from] ReplyError),

    /// Shape contract violation.
    #[error("shape error: {0}")]
    Shape(#[from] ShapeMismatch),
}

impl BusError {
    /// Returns true if this error is a caller-supplied timeout expiring.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Reply(ReplyError::Timeout { .. }))
    }
}

/// Result type alias for quadbus operations.
pub type BusResult<T> = Result<T, BusError>;
