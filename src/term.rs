//! RDF term model.
//!
//! Every other component operates on these value types. Equality is
//! structural throughout: two named nodes are equal iff their IRIs are
//! equal, two blank nodes iff their ids are equal.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `xsd:string` datatype IRI, used for plain string literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// An IRI-identified node, usable in any quad position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedNode(String);

impl NamedNode {
    /// Creates a named node from an IRI.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for NamedNode {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

impl From<String> for NamedNode {
    fn from(iri: String) -> Self {
        Self(iri)
    }
}

/// A blank node with an opaque, scope-local identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BNode(Uuid);

impl BNode {
    /// Creates a blank node with a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a blank node from an existing id.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for BNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0.simple())
    }
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    datatype: NamedNode,
}

impl Literal {
    /// Creates a literal with an explicit datatype.
    pub fn new(lexical: impl Into<String>, datatype: impl Into<NamedNode>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    /// Creates an `xsd:string` literal.
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(text, XSD_STRING)
    }

    /// Returns the lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Returns the datatype IRI.
    #[must_use]
    pub const fn datatype(&self) -> &NamedNode {
        &self.datatype
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}^^{}", self.lexical, self.datatype)
    }
}

impl From<&str> for Literal {
    fn from(text: &str) -> Self {
        Self::string(text)
    }
}

/// Terms usable in the subject or graph position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Resource {
    /// An IRI-identified node.
    Named(NamedNode),
    /// A blank node.
    Blank(BNode),
}

impl Resource {
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    #[must_use]
    pub const fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(n) => Some(n),
            Self::Blank(_) => None,
        }
    }

    #[must_use]
    pub const fn as_blank(&self) -> Option<&BNode> {
        match self {
            Self::Blank(b) => Some(b),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
        }
    }
}

impl From<NamedNode> for Resource {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BNode> for Resource {
    fn from(b: BNode) -> Self {
        Self::Blank(b)
    }
}

impl From<&str> for Resource {
    fn from(iri: &str) -> Self {
        Self::Named(NamedNode::new(iri))
    }
}

/// Any term usable in the object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// An IRI-identified node.
    Named(NamedNode),
    /// A blank node.
    Blank(BNode),
    /// A typed literal.
    Literal(Literal),
}

impl Term {
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    #[must_use]
    pub const fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Narrows the term to a resource, if it is one.
    #[must_use]
    pub fn as_resource(&self) -> Option<Resource> {
        match self {
            Self::Named(n) => Some(Resource::Named(n.clone())),
            Self::Blank(b) => Some(Resource::Blank(*b)),
            Self::Literal(_) => None,
        }
    }

    /// Returns a human-readable kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Named(_) => "named",
            Self::Blank(_) => "blank",
            Self::Literal(_) => "literal",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BNode> for Term {
    fn from(b: BNode) -> Self {
        Self::Blank(b)
    }
}

impl From<Literal> for Term {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<Resource> for Term {
    fn from(r: Resource) -> Self {
        match r {
            Resource::Named(n) => Self::Named(n),
            Resource::Blank(b) => Self::Blank(b),
        }
    }
}

impl From<&str> for Term {
    fn from(iri: &str) -> Self {
        Self::Named(NamedNode::new(iri))
    }
}
