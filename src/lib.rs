//! # quadbus - reactive quad store with performative routing
//!
//! quadbus is an in-memory (graph, subject, predicate, object) fact store
//! whose records can be queried by any combination of fixed and wildcard
//! fields. Facts and queries travel as agent-communication performatives
//! (inform, query-if, query-ref, failure) through a router that forwards
//! each message to the store(s) whose pattern shape matches.
//!
//! ## Core Concepts
//!
//! - **Quad**: an immutable RDF fact with set-semantics identity
//! - **Shape**: which subset of the four fields a pattern holds fixed
//!   (16 in total, statically partitioning the query space)
//! - **Pattern**: a partially-specified quad used as an index key
//! - **Store**: one single-owner worker per shape, indexing every quad
//!   under its own projection
//! - **Router**: a frozen shape-to-store table; assertions fan out,
//!   queries route to exactly one store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quadbus::{Envelope, Pattern, Performative, Quad, ReplyStream, Router, StoreConfig};
//! use quadbus::message::Content;
//!
//! let router = Router::with_all_shapes(&StoreConfig::default());
//! router.dispatch(Envelope::new(Performative::Inform(Content::Quad(
//!     Quad::new("ex:bobInfo", "ex:bob", "rdf:type", "foaf:Person"),
//! ))))?;
//!
//! let (tx, replies) = ReplyStream::channel();
//! let pattern = Pattern::wildcard().with_graph("ex:bobInfo").with_subject("ex:bob");
//! router.dispatch(Envelope::request(Performative::QueryRef(pattern.into()), tx))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data model
pub mod quad;
pub mod shape;
pub mod term;

// Patterns and projection
pub mod pattern;

// Messaging and dispatch
pub mod error;
pub mod message;
pub mod router;
pub mod store;

// Caller conveniences
pub mod builder;
pub mod reply;

// Re-export primary types at crate root for convenience
pub use builder::GraphBuilder;
pub use error::{BusError, BusResult, DispatchError, ReplyError, ShapeMismatch};
pub use message::{Content, ConversationId, Envelope, Performative, RefTarget};
pub use pattern::Pattern;
pub use quad::Quad;
pub use reply::{QueryIfOutcome, ReplyStream};
pub use router::{Router, RouterBuilder};
pub use shape::Shape;
pub use store::{MissPolicy, Retrieval, ShapeStore, StoreConfig, StoreHandle, StoreState};
pub use term::{BNode, Literal, NamedNode, Resource, Term};
