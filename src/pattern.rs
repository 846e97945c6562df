//! Query patterns and shape projection.
//!
//! A pattern is a partially-specified quad used as an index key. Rather
//! than one type per shape, a single struct carries four typed optional
//! fields; its shape is computed from which fields are present, so the
//! router never needs a dynamic type test to classify a pattern.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quad::Quad;
use crate::shape::Shape;
use crate::term::{NamedNode, Resource, Term};

/// A partially-specified quad; one of 16 shapes.
///
/// A field that is `Some` is fixed; a field that is `None` is a wildcard.
/// All patterns with every field `None` compare equal, which makes the
/// all-wildcard shape's key a singleton by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    graph: Option<NamedNode>,
    subject: Option<Resource>,
    predicate: Option<NamedNode>,
    object: Option<Term>,
}

impl Pattern {
    /// The all-wildcard pattern.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self {
            graph: None,
            subject: None,
            predicate: None,
            object: None,
        }
    }

    /// Projects a quad onto a shape: the unique pattern of that shape
    /// whose fixed fields copy the quad's corresponding fields.
    ///
    /// Total and deterministic; a quad always has concrete values for
    /// all four fields, so projection has no error path.
    #[must_use]
    pub fn project(shape: Shape, quad: &Quad) -> Self {
        Self {
            graph: shape.fixes_graph().then(|| quad.graph.clone()),
            subject: shape.fixes_subject().then(|| quad.subject.clone()),
            predicate: shape.fixes_predicate().then(|| quad.predicate.clone()),
            object: shape.fixes_object().then(|| quad.object.clone()),
        }
    }

    /// Fixes the graph field.
    #[must_use]
    pub fn with_graph(mut self, graph: impl Into<NamedNode>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// Fixes the subject field.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Resource>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Fixes the predicate field.
    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<NamedNode>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Fixes the object field.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// The shape this pattern belongs to, computed from field presence.
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::from_flags(
            self.graph.is_some(),
            self.subject.is_some(),
            self.predicate.is_some(),
            self.object.is_some(),
        )
    }

    /// The fixed graph, if this pattern's shape fixes it.
    #[must_use]
    pub const fn graph(&self) -> Option<&NamedNode> {
        self.graph.as_ref()
    }

    /// The fixed subject, if this pattern's shape fixes it.
    #[must_use]
    pub const fn subject(&self) -> Option<&Resource> {
        self.subject.as_ref()
    }

    /// The fixed predicate, if this pattern's shape fixes it.
    #[must_use]
    pub const fn predicate(&self) -> Option<&NamedNode> {
        self.predicate.as_ref()
    }

    /// The fixed object, if this pattern's shape fixes it.
    #[must_use]
    pub const fn object(&self) -> Option<&Term> {
        self.object.as_ref()
    }

    /// Whether a quad agrees with every fixed field of this pattern.
    ///
    /// Equivalent to `Pattern::project(self.shape(), quad) == *self`.
    #[must_use]
    pub fn matches(&self, quad: &Quad) -> bool {
        self.graph.as_ref().map_or(true, |g| *g == quad.graph)
            && self.subject.as_ref().map_or(true, |s| *s == quad.subject)
            && self
                .predicate
                .as_ref()
                .map_or(true, |p| *p == quad.predicate)
            && self.object.as_ref().map_or(true, |o| *o == quad.object)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field<T: fmt::Display>(f: &mut fmt::Formatter<'_>, v: Option<&T>) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{v}"),
                None => write!(f, "?"),
            }
        }

        field(f, self.graph.as_ref())?;
        write!(f, " ")?;
        field(f, self.subject.as_ref())?;
        write!(f, " ")?;
        field(f, self.predicate.as_ref())?;
        write!(f, " ")?;
        field(f, self.object.as_ref())
    }
}
