//! Performatives and message envelopes.
//!
//! The message vocabulary mirrors agent-communication semantics: a sender
//! expresses intent through the performative, and the recipient's reply
//! obligation follows from it:
//!
//! - `Inform` / `Disconfirm`: assertions; no reply required.
//! - `QueryIf`: must always be answered, with one `Inform` per match or a
//!   single `Failure` carrying the pattern when nothing matches.
//! - `QueryRef`: answered with one `Inform` per match; silence on a miss
//!   (under the open-world assumption, absence of a reply is "unknown",
//!   not "false").
//! - `Failure` / `NotUnderstood`: terminal; no further obligation.

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pattern::Pattern;
use crate::quad::Quad;
use crate::shape::Shape;

/// Correlates a request with its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Creates a fresh random conversation id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content carried by assertion-class performatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A single quad.
    Quad(Quad),
    /// A batch of quads.
    Quads(Vec<Quad>),
    /// A pattern (used by `Failure` replies and known-pattern listings).
    Pattern(Pattern),
}

/// What a `QueryRef` asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// Quads indexed under this exact pattern key.
    Pattern(Pattern),
    /// Every pattern key currently present in the store of this shape,
    /// e.g. "which graphs exist".
    KnownPatterns(Shape),
}

impl RefTarget {
    /// The shape the router should dispatch this target to.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Pattern(p) => p.shape(),
            Self::KnownPatterns(s) => *s,
        }
    }
}

impl From<Pattern> for RefTarget {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

/// A tagged message kind expressing sender intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performative {
    /// Assert that a fact is true.
    Inform(Content),
    /// Assert that a fact is no longer true.
    Disconfirm(Content),
    /// Ask whether a pattern holds; the recipient must always answer.
    QueryIf(Pattern),
    /// Ask what matches; the recipient may stay silent on a miss.
    QueryRef(RefTarget),
    /// The recipient could not satisfy a request.
    Failure(Content),
    /// The recipient does not support the original message.
    NotUnderstood(Box<Performative>),
}

impl Performative {
    /// Returns a human-readable kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Inform(_) => "inform",
            Self::Disconfirm(_) => "disconfirm",
            Self::QueryIf(_) => "query-if",
            Self::QueryRef(_) => "query-ref",
            Self::Failure(_) => "failure",
            Self::NotUnderstood(_) => "not-understood",
        }
    }

    /// Whether this performative is terminal (carries no reply obligation).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failure(_) | Self::NotUnderstood(_))
    }
}

/// A performative wrapped with conversation headers.
///
/// `reply_to` is the requester's own channel sender; forwarding an envelope
/// preserves it, which is how a store's replies reach the original
/// requester directly rather than whoever routed the request.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Correlation id echoed by every reply.
    pub conversation_id: ConversationId,
    /// When the envelope was created.
    pub sent_at: DateTime<Utc>,
    /// Where replies go; `None` for one-way assertions.
    pub reply_to: Option<Sender<Envelope>>,
    /// The message itself.
    pub body: Performative,
}

impl Envelope {
    /// Wraps a one-way performative (no replies expected).
    #[must_use]
    pub fn new(body: Performative) -> Self {
        Self {
            conversation_id: ConversationId::new(),
            sent_at: Utc::now(),
            reply_to: None,
            body,
        }
    }

    /// Wraps a request whose replies should go to `reply_to`.
    #[must_use]
    pub fn request(body: Performative, reply_to: Sender<Envelope>) -> Self {
        Self {
            conversation_id: ConversationId::new(),
            sent_at: Utc::now(),
            reply_to: Some(reply_to),
            body,
        }
    }

    /// Builds a reply to this envelope, echoing its conversation id.
    #[must_use]
    pub fn reply_with(&self, body: Performative) -> Self {
        Self {
            conversation_id: self.conversation_id,
            sent_at: Utc::now(),
            reply_to: None,
            body,
        }
    }
}
