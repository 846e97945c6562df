//! The quadruple fact type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::{NamedNode, Resource, Term};

/// A (graph, subject, predicate, object) fact.
///
/// Quads are immutable value types; identity is pure structural equality,
/// so a store holding quads in a set treats re-insertion of an identical
/// quad as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    /// The graph the fact belongs to.
    pub graph: NamedNode,
    /// The subject resource.
    pub subject: Resource,
    /// The predicate.
    pub predicate: NamedNode,
    /// The object term.
    pub object: Term,
}

impl Quad {
    /// Creates a quad from its four fields.
    pub fn new(
        graph: impl Into<NamedNode>,
        subject: impl Into<Resource>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            graph: graph.into(),
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} .",
            self.graph, self.subject, self.predicate, self.object
        )
    }
}
