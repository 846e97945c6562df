//! Shape-keyed message routing.
//!
//! The router holds one store handle per registered shape, frozen at
//! construction. Assertions fan out to every registered store; queries go
//! to the single store whose shape matches the pattern, with the original
//! requester preserved as the reply target. The router itself keeps no
//! mutable state beyond counters, so it can be called concurrently from
//! any number of threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::DispatchError;
use crate::message::{Envelope, Performative};
use crate::shape::Shape;
use crate::store::{ShapeStore, StoreConfig, StoreHandle};

/// Assembles a routing table from per-shape stores.
///
/// A partial table is legal; shapes without an entry are unroutable and
/// queries against them are answered with `NotUnderstood`. Registering a
/// shape twice replaces the earlier entry.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    table: HashMap<Shape, StoreHandle>,
    stores: Vec<ShapeStore>,
}

impl RouterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a store the router will own.
    #[must_use]
    pub fn register(mut self, store: ShapeStore) -> Self {
        self.table.insert(store.shape(), store.handle());
        self.stores.push(store);
        self
    }

    /// Registers an externally owned store by handle.
    #[must_use]
    pub fn register_handle(mut self, handle: StoreHandle) -> Self {
        self.table.insert(handle.shape(), handle);
        self
    }

    /// Registers one store per shape, built by `factory`.
    #[must_use]
    pub fn with_stores(
        mut self,
        shapes: impl IntoIterator<Item = Shape>,
        mut factory: impl FnMut(Shape) -> ShapeStore,
    ) -> Self {
        for shape in shapes {
            self = self.register(factory(shape));
        }
        self
    }

    /// Freezes the table and produces the router.
    #[must_use]
    pub fn build(self) -> Router {
        Router {
            table: self.table,
            stores: self.stores,
            facts_broadcast: AtomicU64::new(0),
            queries_routed: AtomicU64::new(0),
            broadcast_drops: AtomicU64::new(0),
            not_understood_replies: AtomicU64::new(0),
        }
    }
}

/// Dispatches envelopes to per-shape stores.
#[derive(Debug)]
pub struct Router {
    table: HashMap<Shape, StoreHandle>,
    /// Stores the router owns; their workers live as long as the router.
    stores: Vec<ShapeStore>,
    facts_broadcast: AtomicU64,
    queries_routed: AtomicU64,
    broadcast_drops: AtomicU64,
    not_understood_replies: AtomicU64,
}

impl Router {
    /// Returns an empty builder.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Spawns one store per each of the 16 shapes.
    #[must_use]
    pub fn with_all_shapes(config: &StoreConfig) -> Self {
        Self::builder()
            .with_stores(Shape::all(), |shape| ShapeStore::spawn(shape, config))
            .build()
    }

    /// Shapes with a registered store.
    #[must_use]
    pub fn registered_shapes(&self) -> Vec<Shape> {
        self.table.keys().copied().collect()
    }

    /// The stores this router owns (for counter inspection).
    #[must_use]
    pub fn stores(&self) -> &[ShapeStore] {
        &self.stores
    }

    /// Routes one envelope.
    ///
    /// `Inform` and `Disconfirm` are broadcast to every registered store,
    /// best-effort: a full or vanished mailbox is counted, not waited on.
    /// `QueryIf` and `QueryRef` go to the single store for the pattern's
    /// shape; an unroutable shape is answered with `NotUnderstood` and is
    /// not an error. Terminal performatives are accepted and dropped.
    ///
    /// # Errors
    /// Only for queries: [`DispatchError::MailboxFull`] or
    /// [`DispatchError::Disconnected`] when the target store cannot take
    /// the message the requester is waiting on.
    pub fn dispatch(&self, envelope: Envelope) -> Result<(), DispatchError> {
        match &envelope.body {
            Performative::Inform(_) | Performative::Disconfirm(_) => {
                self.broadcast(&envelope);
                Ok(())
            }
            Performative::QueryIf(pattern) => self.route(pattern.shape(), envelope),
            Performative::QueryRef(target) => self.route(target.shape(), envelope),
            // Terminal performatives carry no reply obligation.
            Performative::Failure(_) | Performative::NotUnderstood(_) => Ok(()),
        }
    }

    /// Facts broadcast (each counted once, not per store).
    #[must_use]
    pub fn facts_broadcast(&self) -> u64 {
        self.facts_broadcast.load(Ordering::Relaxed)
    }

    /// Queries forwarded to a store.
    #[must_use]
    pub fn queries_routed(&self) -> u64 {
        self.queries_routed.load(Ordering::Relaxed)
    }

    /// Per-store broadcast deliveries that were dropped.
    #[must_use]
    pub fn broadcast_drops(&self) -> u64 {
        self.broadcast_drops.load(Ordering::Relaxed)
    }

    /// `NotUnderstood` replies issued for unroutable shapes.
    #[must_use]
    pub fn not_understood_replies(&self) -> u64 {
        self.not_understood_replies.load(Ordering::Relaxed)
    }

    fn broadcast(&self, envelope: &Envelope) {
        for handle in self.table.values() {
            if handle.send(envelope.clone()).is_err() {
                self.broadcast_drops.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.facts_broadcast.fetch_add(1, Ordering::Relaxed);
    }

    fn route(&self, shape: Shape, envelope: Envelope) -> Result<(), DispatchError> {
        let Some(handle) = self.table.get(&shape) else {
            // UnroutableShape is recovered locally, never a crash.
            self.not_understood_replies.fetch_add(1, Ordering::Relaxed);
            if let Some(tx) = &envelope.reply_to {
                let reply = envelope.reply_with(Performative::NotUnderstood(Box::new(
                    envelope.body.clone(),
                )));
                // Requester gone or slow: nothing left to tell it.
                let _ = tx.try_send(reply);
            }
            return Ok(());
        };

        handle.send(envelope)?;
        self.queries_routed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Content, RefTarget};
    use crate::pattern::Pattern;
    use crate::quad::Quad;
    use crossbeam_channel::bounded;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(1);

    #[test]
    fn test_partial_table_answers_not_understood() {
        let router = Router::builder()
            .register(ShapeStore::spawn(Shape::S, &StoreConfig::default()))
            .build();

        let (tx, rx) = bounded::<Envelope>(16);
        let body = Performative::QueryIf(Pattern::wildcard().with_graph("ex:g"));
        router.dispatch(Envelope::request(body.clone(), tx)).unwrap();

        let reply = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(reply.body, Performative::NotUnderstood(Box::new(body)));
        assert_eq!(router.not_understood_replies(), 1);
    }

    #[test]
    fn test_broadcast_reaches_every_store() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        let quad = Quad::new("ex:g", "ex:s", "ex:p", "ex:o");
        router
            .dispatch(Envelope::new(Performative::Inform(Content::Quad(
                quad.clone(),
            ))))
            .unwrap();

        // Every shape's store can answer for its own projection.
        for shape in [Shape::G, Shape::SP, Shape::GSPO] {
            let (tx, rx) = bounded::<Envelope>(16);
            let pattern = Pattern::project(shape, &quad);
            router
                .dispatch(Envelope::request(Performative::QueryIf(pattern), tx))
                .unwrap();
            let reply = rx.recv_timeout(WAIT).unwrap();
            assert_eq!(
                reply.body,
                Performative::Inform(Content::Quad(quad.clone()))
            );
        }
        assert_eq!(router.facts_broadcast(), 1);
    }

    #[test]
    fn test_query_routes_to_single_store() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        router
            .dispatch(Envelope::new(Performative::Inform(Content::Quad(
                Quad::new("ex:g", "ex:s", "ex:p", "ex:o"),
            ))))
            .unwrap();

        let (tx, rx) = bounded::<Envelope>(16);
        router
            .dispatch(Envelope::request(
                Performative::QueryRef(RefTarget::KnownPatterns(Shape::G)),
                tx,
            ))
            .unwrap();

        let reply = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(
            reply.body,
            Performative::Inform(Content::Pattern(
                Pattern::wildcard().with_graph("ex:g")
            ))
        );
        assert_eq!(router.queries_routed(), 1);
    }

    #[test]
    fn test_terminal_performatives_are_dropped() {
        let router = Router::with_all_shapes(&StoreConfig::default());
        router
            .dispatch(Envelope::new(Performative::Failure(Content::Pattern(
                Pattern::wildcard(),
            ))))
            .unwrap();
        router
            .dispatch(Envelope::new(Performative::NotUnderstood(Box::new(
                Performative::QueryIf(Pattern::wildcard()),
            ))))
            .unwrap();

        assert_eq!(router.facts_broadcast(), 0);
        assert_eq!(router.queries_routed(), 0);
    }

    #[test]
    fn test_external_handle_registration() {
        let store = ShapeStore::spawn(Shape::S, &StoreConfig::default());
        let router = Router::builder().register_handle(store.handle()).build();

        router
            .dispatch(Envelope::new(Performative::Inform(Content::Quad(
                Quad::new("ex:g", "ex:bob", "ex:p", "ex:o"),
            ))))
            .unwrap();

        let (tx, rx) = bounded::<Envelope>(16);
        let pattern = Pattern::wildcard().with_subject("ex:bob");
        router
            .dispatch(Envelope::request(Performative::QueryIf(pattern), tx))
            .unwrap();
        assert!(matches!(
            rx.recv_timeout(WAIT).unwrap().body,
            Performative::Inform(_)
        ));
    }
}
