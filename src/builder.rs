//! Graph construction convenience.
//!
//! A fluent builder for describing several facts about one subject in one
//! graph without repeating the shared fields. The output is plain quads;
//! asserting them is the caller's business.

use crate::quad::Quad;
use crate::term::{NamedNode, Resource, Term};

/// Accumulates quads for one graph, one subject at a time.
///
/// # Examples
///
/// ```
/// use quadbus::GraphBuilder;
///
/// let quads = GraphBuilder::new("ex:bobInfo", "ex:bob")
///     .fact("rdf:type", "foaf:Person")
///     .fact("foaf:name", quadbus::Literal::string("Bob"))
///     .build();
/// assert_eq!(quads.len(), 2);
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    graph: NamedNode,
    subject: Resource,
    quads: Vec<Quad>,
}

impl GraphBuilder {
    /// Starts a builder for one graph and an initial subject.
    pub fn new(graph: impl Into<NamedNode>, subject: impl Into<Resource>) -> Self {
        Self {
            graph: graph.into(),
            subject: subject.into(),
            quads: Vec::new(),
        }
    }

    /// Adds a fact about the current subject.
    #[must_use]
    pub fn fact(mut self, predicate: impl Into<NamedNode>, object: impl Into<Term>) -> Self {
        self.quads.push(Quad {
            graph: self.graph.clone(),
            subject: self.subject.clone(),
            predicate: predicate.into(),
            object: object.into(),
        });
        self
    }

    /// Switches to another subject; later facts describe it.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<Resource>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Returns the accumulated quads.
    #[must_use]
    pub fn build(self) -> Vec<Quad> {
        self.quads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{BNode, Literal};

    #[test]
    fn test_facts_share_graph_and_subject() {
        let quads = GraphBuilder::new("ex:g", "ex:bob")
            .fact("ex:p1", "ex:o1")
            .fact("ex:p2", Literal::string("o2"))
            .build();

        assert_eq!(quads.len(), 2);
        for quad in &quads {
            assert_eq!(quad.graph, NamedNode::new("ex:g"));
            assert_eq!(quad.subject, Resource::from("ex:bob"));
        }
        assert_ne!(quads[0], quads[1]);
    }

    #[test]
    fn test_subject_switch() {
        let friend = BNode::new();
        let quads = GraphBuilder::new("ex:g", "ex:bob")
            .fact("foaf:knows", friend)
            .subject(friend)
            .fact("foaf:name", Literal::string("Alice"))
            .build();

        assert_eq!(quads[0].subject, Resource::from("ex:bob"));
        assert_eq!(quads[1].subject, Resource::from(friend));
    }

    #[test]
    fn test_empty_builder_yields_no_quads() {
        assert!(GraphBuilder::new("ex:g", "ex:s").build().is_empty());
    }
}
