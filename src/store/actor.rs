//! Store worker and mailbox.
//!
//! A `ShapeStore` runs one dedicated thread that exclusively owns a
//! [`StoreState`] and drains a bounded mailbox in FIFO order. Replies are
//! sent with non-blocking `try_send` so a slow or vanished requester can
//! never stall the worker; dropped replies are counted, not waited on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::error::DispatchError;
use crate::message::{Content, Envelope, Performative, RefTarget};
use crate::shape::Shape;
use crate::store::state::{MissPolicy, Retrieval, StoreState};

/// Mailbox configuration for a store worker.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Max queued envelopes before senders see backpressure.
    pub mailbox_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1024,
        }
    }
}

/// A cloneable address for one store's mailbox.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    shape: Shape,
    capacity: usize,
    tx: Sender<Envelope>,
}

impl StoreHandle {
    /// The shape of the store behind this handle.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Enqueues an envelope without blocking.
    ///
    /// # Errors
    /// [`DispatchError::MailboxFull`] when the mailbox is at capacity,
    /// [`DispatchError::Disconnected`] when the worker has shut down.
    pub fn send(&self, envelope: Envelope) -> Result<(), DispatchError> {
        match self.tx.try_send(envelope) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DispatchError::MailboxFull {
                shape: self.shape,
                capacity: self.capacity,
            }),
            Err(TrySendError::Disconnected(_)) => {
                Err(DispatchError::Disconnected { shape: self.shape })
            }
        }
    }
}

/// A per-shape store with its own worker thread and mailbox.
#[derive(Debug)]
pub struct ShapeStore {
    handle: StoreHandle,
    replies_dropped: Arc<AtomicU64>,
    disconfirms_seen: Arc<AtomicU64>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl ShapeStore {
    /// Spawns the worker for one shape.
    #[must_use]
    pub fn spawn(shape: Shape, config: &StoreConfig) -> Self {
        let capacity = config.mailbox_capacity.max(1);
        let (tx, rx) = bounded::<Envelope>(capacity);

        let replies_dropped = Arc::new(AtomicU64::new(0));
        let disconfirms_seen = Arc::new(AtomicU64::new(0));

        let thread_replies_dropped = Arc::clone(&replies_dropped);
        let thread_disconfirms_seen = Arc::clone(&disconfirms_seen);
        let join = thread::Builder::new()
            .name(format!("quadbus-store-{shape}"))
            .spawn(move || {
                worker_loop(shape, &rx, &thread_replies_dropped, &thread_disconfirms_seen);
            })
            .expect("failed to spawn quadbus store worker");

        Self {
            handle: StoreHandle {
                shape,
                capacity,
                tx,
            },
            replies_dropped,
            disconfirms_seen,
            join: Mutex::new(Some(join)),
        }
    }

    /// The shape this store indexes under.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.handle.shape
    }

    /// Returns a cloneable address for this store's mailbox.
    #[must_use]
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Enqueues an envelope without blocking.
    ///
    /// # Errors
    /// See [`StoreHandle::send`].
    pub fn send(&self, envelope: Envelope) -> Result<(), DispatchError> {
        self.handle.send(envelope)
    }

    /// Replies that could not reach their requester (slow, gone, or no
    /// reply target on a query).
    #[must_use]
    pub fn replies_dropped(&self) -> u64 {
        self.replies_dropped.load(Ordering::Relaxed)
    }

    /// `Disconfirm` messages accepted. Retraction semantics are undecided,
    /// so the count is the only observable effect.
    #[must_use]
    pub fn disconfirms_seen(&self) -> u64 {
        self.disconfirms_seen.load(Ordering::Relaxed)
    }
}

impl Drop for ShapeStore {
    fn drop(&mut self) {
        // Close our sender so the worker can drain and exit.
        let (dummy_tx, _) = bounded::<Envelope>(1);
        let old = std::mem::replace(&mut self.handle.tx, dummy_tx);
        drop(old);

        if let Ok(mut guard) = self.join.lock() {
            if let Some(handle) = guard.take() {
                // Do not join here.
                //
                // Callers may hold `StoreHandle` clones beyond the store's
                // lifetime; the worker only exits once the last sender is
                // dropped, so joining could deadlock. Detaching is safe.
                drop(handle);
            }
        }
    }
}

fn worker_loop(
    shape: Shape,
    rx: &Receiver<Envelope>,
    replies_dropped: &AtomicU64,
    disconfirms_seen: &AtomicU64,
) {
    let mut state = StoreState::new(shape);
    while let Ok(envelope) = rx.recv() {
        handle_envelope(&mut state, &envelope, replies_dropped, disconfirms_seen);
    }
}

fn handle_envelope(
    state: &mut StoreState,
    envelope: &Envelope,
    replies_dropped: &AtomicU64,
    disconfirms_seen: &AtomicU64,
) {
    match &envelope.body {
        Performative::Inform(Content::Quad(quad)) => {
            state.store(quad.clone());
        }
        Performative::Inform(Content::Quads(quads)) => {
            for quad in quads {
                state.store(quad.clone());
            }
        }
        // A pattern inform carries nothing indexable; accept and move on.
        Performative::Inform(Content::Pattern(_)) => {}

        Performative::Disconfirm(_) => {
            // Retraction semantics are undecided; accept, count, leave the
            // map unchanged.
            disconfirms_seen.fetch_add(1, Ordering::Relaxed);
        }

        Performative::QueryIf(pattern) => {
            match state.retrieve(pattern, MissPolicy::ReportMiss) {
                Ok(Retrieval::Matches(quads)) => {
                    for quad in quads {
                        reply(
                            envelope,
                            Performative::Inform(Content::Quad(quad)),
                            replies_dropped,
                        );
                    }
                }
                Ok(Retrieval::Failure(pattern)) => {
                    reply(
                        envelope,
                        Performative::Failure(Content::Pattern(pattern)),
                        replies_dropped,
                    );
                }
                // ReportMiss never yields Miss.
                Ok(Retrieval::Miss) => {}
                Err(_) => reply_not_understood(envelope, replies_dropped),
            }
        }

        Performative::QueryRef(RefTarget::Pattern(pattern)) => {
            match state.retrieve(pattern, MissPolicy::Silent) {
                Ok(Retrieval::Matches(quads)) => {
                    for quad in quads {
                        reply(
                            envelope,
                            Performative::Inform(Content::Quad(quad)),
                            replies_dropped,
                        );
                    }
                }
                // Open-world: an absent key is "unknown", not "false".
                Ok(Retrieval::Miss) => {}
                Ok(Retrieval::Failure(_)) => {}
                Err(_) => reply_not_understood(envelope, replies_dropped),
            }
        }

        Performative::QueryRef(RefTarget::KnownPatterns(shape)) => {
            if *shape == state.shape() {
                for pattern in state.known_patterns() {
                    reply(
                        envelope,
                        Performative::Inform(Content::Pattern(pattern)),
                        replies_dropped,
                    );
                }
            } else {
                reply_not_understood(envelope, replies_dropped);
            }
        }

        // Terminal performatives carry no reply obligation.
        Performative::Failure(_) | Performative::NotUnderstood(_) => {}
    }
}

fn reply(envelope: &Envelope, body: Performative, replies_dropped: &AtomicU64) {
    let Some(tx) = &envelope.reply_to else {
        replies_dropped.fetch_add(1, Ordering::Relaxed);
        return;
    };

    // Never block the worker: drop the reply if the requester is slow.
    match tx.try_send(envelope.reply_with(body)) {
        Ok(()) => {}
        Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
            replies_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn reply_not_understood(envelope: &Envelope, replies_dropped: &AtomicU64) {
    reply(
        envelope,
        Performative::NotUnderstood(Box::new(envelope.body.clone())),
        replies_dropped,
    );
}
