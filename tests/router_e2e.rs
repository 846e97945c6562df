use std::time::Duration;

use quadbus::{
    Content, Envelope, Pattern, Performative, Quad, RefTarget, ReplyStream, Router, Shape,
    ShapeStore, StoreConfig,
};

const FIRST: Duration = Duration::from_secs(2);

fn inform(quad: Quad) -> Envelope {
    Envelope::new(Performative::Inform(Content::Quad(quad)))
}

// One broadcast fact becomes queryable under every shape's own projection.
#[test]
fn broadcast_fact_is_indexed_by_every_store() {
    let router = Router::with_all_shapes(&StoreConfig::default());
    let quad = Quad::new("ex:g", "ex:s", "ex:p", "ex:o");
    router.dispatch(inform(quad.clone())).unwrap();

    for shape in Shape::all() {
        let (tx, replies) = ReplyStream::channel();
        let pattern = Pattern::project(shape, &quad);
        router
            .dispatch(Envelope::request(Performative::QueryIf(pattern), tx))
            .unwrap();

        let reply = replies.recv_timeout(FIRST).unwrap();
        assert_eq!(
            reply.body,
            Performative::Inform(Content::Quad(quad.clone())),
            "shape {shape} did not index the broadcast fact"
        );
    }
}

// Shape isolation: facts reaching one store never leak into another
// shape's store. Two standalone stores receive different facts.
#[test]
fn stores_do_not_share_state() {
    let subject_store = ShapeStore::spawn(Shape::S, &StoreConfig::default());
    let graph_store = ShapeStore::spawn(Shape::G, &StoreConfig::default());

    let quad = Quad::new("ex:g", "ex:bob", "ex:p", "ex:o");
    subject_store.send(inform(quad.clone())).unwrap();

    // The graph store was never informed: its key for the quad is absent.
    let (tx, replies) = ReplyStream::channel();
    graph_store
        .send(Envelope::request(
            Performative::QueryIf(Pattern::wildcard().with_graph("ex:g")),
            tx,
        ))
        .unwrap();
    assert!(matches!(
        replies.recv_timeout(FIRST).unwrap().body,
        Performative::Failure(_)
    ));

    // The subject store answers for its own projection.
    let (tx, replies) = ReplyStream::channel();
    subject_store
        .send(Envelope::request(
            Performative::QueryIf(Pattern::wildcard().with_subject("ex:bob")),
            tx,
        ))
        .unwrap();
    assert_eq!(
        replies.recv_timeout(FIRST).unwrap().body,
        Performative::Inform(Content::Quad(quad))
    );
}

// A shape-token QueryRef lists every key of that shape's store, which is
// how a caller discovers e.g. which graphs exist.
#[test]
fn known_patterns_listing_discovers_graphs() {
    let router = Router::with_all_shapes(&StoreConfig::default());
    router
        .dispatch(inform(Quad::new("ex:g1", "ex:s", "ex:p", "ex:o")))
        .unwrap();
    router
        .dispatch(inform(Quad::new("ex:g2", "ex:s", "ex:p", "ex:o")))
        .unwrap();
    router
        .dispatch(inform(Quad::new("ex:g2", "ex:s2", "ex:p", "ex:o")))
        .unwrap();

    let (tx, replies) = ReplyStream::channel();
    router
        .dispatch(Envelope::request(
            Performative::QueryRef(RefTarget::KnownPatterns(Shape::G)),
            tx,
        ))
        .unwrap();

    let mut graphs = Vec::new();
    for envelope in replies.collect_for(Duration::from_millis(500)) {
        let Performative::Inform(Content::Pattern(pattern)) = envelope.body else {
            panic!("expected pattern inform");
        };
        graphs.push(pattern);
    }
    // Two distinct graphs, each listed once.
    assert_eq!(graphs.len(), 2);
    assert!(graphs.contains(&Pattern::wildcard().with_graph("ex:g1")));
    assert!(graphs.contains(&Pattern::wildcard().with_graph("ex:g2")));
}

// Replies echo the request's conversation id, so a requester can
// correlate replies from interleaved conversations on one channel.
#[test]
fn replies_echo_conversation_id() {
    let router = Router::with_all_shapes(&StoreConfig::default());
    router
        .dispatch(inform(Quad::new("ex:g", "ex:bob", "ex:p", "ex:o")))
        .unwrap();

    let (tx, replies) = ReplyStream::channel();
    let request = Envelope::request(
        Performative::QueryIf(Pattern::wildcard().with_subject("ex:bob")),
        tx,
    );
    let conversation_id = request.conversation_id;
    router.dispatch(request).unwrap();

    let reply = replies.recv_timeout(FIRST).unwrap();
    assert_eq!(reply.conversation_id, conversation_id);
}

// The router can be driven from several threads at once; each requester
// gets its own complete answer.
#[test]
fn concurrent_queries_each_get_their_answer() {
    let router = std::sync::Arc::new(Router::with_all_shapes(&StoreConfig::default()));
    for n in 0..8 {
        router
            .dispatch(inform(Quad::new(
                "ex:g",
                format!("ex:s{n}").as_str(),
                "ex:p",
                "ex:o",
            )))
            .unwrap();
    }

    let mut workers = Vec::new();
    for n in 0..8 {
        let router = std::sync::Arc::clone(&router);
        workers.push(std::thread::spawn(move || {
            let (tx, replies) = ReplyStream::channel();
            let pattern = Pattern::wildcard().with_subject(format!("ex:s{n}").as_str());
            router
                .dispatch(Envelope::request(Performative::QueryIf(pattern), tx))
                .unwrap();
            replies.recv_timeout(FIRST).unwrap()
        }));
    }

    for (n, worker) in workers.into_iter().enumerate() {
        let reply = worker.join().unwrap();
        let Performative::Inform(Content::Quad(quad)) = reply.body else {
            panic!("expected inform for requester {n}");
        };
        assert_eq!(quad.subject, quadbus::Resource::from(format!("ex:s{n}").as_str()));
    }
}

// Broadcast visibility is per store, not atomic across stores: a fact may
// be queryable under one shape before another. The guarantee tested here
// is the eventual one: once a store has answered for the fact, every
// other store answers too (FIFO per mailbox makes the earlier broadcast
// visible before the later query).
#[test]
fn broadcast_is_eventually_visible_everywhere() {
    let router = Router::with_all_shapes(&StoreConfig::default());
    let quad = Quad::new("ex:g", "ex:s", "ex:p", "ex:o");
    router.dispatch(inform(quad.clone())).unwrap();

    // Wait on one store first.
    let (tx, replies) = ReplyStream::channel();
    router
        .dispatch(Envelope::request(
            Performative::QueryIf(Pattern::project(Shape::GSPO, &quad)),
            tx,
        ))
        .unwrap();
    replies.recv_timeout(FIRST).unwrap();

    // Every other store received the same broadcast in its own mailbox
    // before our query reaches it.
    for shape in Shape::all() {
        let (tx, replies) = ReplyStream::channel();
        router
            .dispatch(Envelope::request(
                Performative::QueryIf(Pattern::project(shape, &quad)),
                tx,
            ))
            .unwrap();
        assert!(matches!(
            replies.recv_timeout(FIRST).unwrap().body,
            Performative::Inform(_)
        ));
    }
}
