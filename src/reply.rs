//! Blocking reply collection.
//!
//! The core is purely message-passing and never times out; a caller that
//! wants synchronous semantics wraps the receiver side of its reply
//! channel in a [`ReplyStream`] and supplies its own timeouts. For a
//! `QueryRef` that matches nothing the timeout expiring is the expected
//! outcome, not a fault.

use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::error::ReplyError;
use crate::message::{Content, Envelope, Performative};
use crate::pattern::Pattern;
use crate::quad::Quad;

/// Default reply channel capacity.
pub const DEFAULT_REPLY_CAPACITY: usize = 1024;

/// Decoded outcome of a `QueryIf` conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIfOutcome {
    /// One `Inform` arrived per indexed quad.
    Matches(Vec<Quad>),
    /// The pattern was absent; the store reported the miss.
    Failure(Pattern),
    /// The recipient rejected the request.
    NotUnderstood(Box<Performative>),
}

/// The receiver half of a reply channel, with timeout-based collection.
#[derive(Debug)]
pub struct ReplyStream {
    rx: Receiver<Envelope>,
}

impl ReplyStream {
    /// Creates a reply channel with the default capacity.
    ///
    /// The sender goes into [`Envelope::request`]; the stream stays with
    /// the requester.
    #[must_use]
    pub fn channel() -> (Sender<Envelope>, Self) {
        Self::with_capacity(DEFAULT_REPLY_CAPACITY)
    }

    /// Creates a reply channel with an explicit capacity.
    ///
    /// Size it for the expected reply volume: stores drop (and count)
    /// replies they cannot enqueue rather than block.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Sender<Envelope>, Self) {
        let (tx, rx) = bounded::<Envelope>(capacity.max(1));
        (tx, Self { rx })
    }

    /// Waits for one reply.
    ///
    /// # Errors
    /// [`ReplyError::Timeout`] when nothing arrives in time,
    /// [`ReplyError::Disconnected`] when every sender is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Envelope, ReplyError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => ReplyError::Timeout {
                duration_ms: duration_ms(timeout),
            },
            RecvTimeoutError::Disconnected => ReplyError::Disconnected,
        })
    }

    /// Drains replies until `window` has elapsed.
    #[must_use]
    pub fn collect_for(&self, window: Duration) -> Vec<Envelope> {
        let deadline = Instant::now() + window;
        let mut out = Vec::new();
        loop {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            match self.rx.recv_timeout(remaining) {
                Ok(envelope) => out.push(envelope),
                Err(_) => break,
            }
        }
        out
    }

    /// Collects the full answer to a `QueryIf`.
    ///
    /// `QueryIf` guarantees at least one reply, so `first` bounds the wait
    /// for it; the reply count is not announced, so after the first
    /// `Inform` the stream is drained until an `idle` gap.
    ///
    /// # Errors
    /// [`ReplyError::Timeout`] if no reply arrives within `first`,
    /// [`ReplyError::UnexpectedReply`] if a reply is not an `Inform` quad,
    /// a `Failure` pattern, or a `NotUnderstood`.
    pub fn collect_query_if(
        &self,
        first: Duration,
        idle: Duration,
    ) -> Result<QueryIfOutcome, ReplyError> {
        let head = self.recv_timeout(first)?;
        let mut quads = match head.body {
            Performative::Failure(Content::Pattern(pattern)) => {
                return Ok(QueryIfOutcome::Failure(pattern));
            }
            Performative::NotUnderstood(original) => {
                return Ok(QueryIfOutcome::NotUnderstood(original));
            }
            Performative::Inform(Content::Quad(quad)) => vec![quad],
            other => {
                return Err(ReplyError::UnexpectedReply { kind: other.kind() });
            }
        };

        loop {
            match self.rx.recv_timeout(idle) {
                Ok(envelope) => match envelope.body {
                    Performative::Inform(Content::Quad(quad)) => quads.push(quad),
                    other => {
                        return Err(ReplyError::UnexpectedReply { kind: other.kind() });
                    }
                },
                Err(_) => break,
            }
        }

        Ok(QueryIfOutcome::Matches(quads))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use crate::store::StoreConfig;

    const FIRST: Duration = Duration::from_secs(1);
    const IDLE: Duration = Duration::from_millis(100);

    #[test]
    fn test_collect_query_if_failure() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        let (tx, stream) = ReplyStream::channel();
        let pattern = Pattern::wildcard().with_subject("ex:bob");
        router
            .dispatch(Envelope::request(
                Performative::QueryIf(pattern.clone()),
                tx,
            ))
            .unwrap();

        let outcome = stream.collect_query_if(FIRST, IDLE).unwrap();
        assert_eq!(outcome, QueryIfOutcome::Failure(pattern));
    }

    #[test]
    fn test_collect_query_if_matches() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        for n in 0..3 {
            router
                .dispatch(Envelope::new(Performative::Inform(Content::Quad(
                    Quad::new("ex:g", "ex:bob", format!("ex:p{n}"), "ex:o"),
                ))))
                .unwrap();
        }

        let (tx, stream) = ReplyStream::channel();
        router
            .dispatch(Envelope::request(
                Performative::QueryIf(Pattern::wildcard().with_subject("ex:bob")),
                tx,
            ))
            .unwrap();

        let QueryIfOutcome::Matches(quads) = stream.collect_query_if(FIRST, IDLE).unwrap() else {
            panic!("expected matches");
        };
        assert_eq!(quads.len(), 3);
    }

    #[test]
    fn test_query_ref_miss_times_out_normally() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        let (tx, stream) = ReplyStream::channel();
        router
            .dispatch(Envelope::request(
                Performative::QueryRef(crate::message::RefTarget::Pattern(
                    Pattern::wildcard().with_subject("ex:nobody"),
                )),
                tx,
            ))
            .unwrap();

        let err = stream.recv_timeout(Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, ReplyError::Timeout { .. }));
    }

    #[test]
    fn test_collect_for_gathers_within_window() {
        let (tx, stream) = ReplyStream::with_capacity(8);
        let env = Envelope::new(Performative::Inform(Content::Quad(Quad::new(
            "ex:g", "ex:s", "ex:p", "ex:o",
        ))));
        tx.send(env.reply_with(env.body.clone())).unwrap();
        tx.send(env.reply_with(env.body.clone())).unwrap();
        drop(tx);

        let replies = stream.collect_for(Duration::from_millis(100));
        assert_eq!(replies.len(), 2);
    }
}
