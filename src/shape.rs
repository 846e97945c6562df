//! Pattern shapes.
//!
//! A shape names which subset of {graph, subject, predicate, object} a
//! pattern holds fixed. The 16 shapes tile a 4-bit space and statically
//! partition the query space: the router keys its table on the shape, so
//! dispatch is an O(1) lookup rather than a scan.

use std::fmt;

use serde::{Deserialize, Serialize};

const GRAPH_BIT: u8 = 0b1000;
const SUBJECT_BIT: u8 = 0b0100;
const PREDICATE_BIT: u8 = 0b0010;
const OBJECT_BIT: u8 = 0b0001;

/// A bitmask over the four quad fields; a set bit means "fixed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Shape(u8);

impl Shape {
    /// All four fields wildcard. Patterns of this shape are a singleton key.
    pub const WILDCARD: Self = Self(0);
    /// Graph fixed.
    pub const G: Self = Self(GRAPH_BIT);
    /// Subject fixed.
    pub const S: Self = Self(SUBJECT_BIT);
    /// Predicate fixed.
    pub const P: Self = Self(PREDICATE_BIT);
    /// Object fixed.
    pub const O: Self = Self(OBJECT_BIT);
    /// Graph and subject fixed.
    pub const GS: Self = Self(GRAPH_BIT | SUBJECT_BIT);
    /// Graph and predicate fixed.
    pub const GP: Self = Self(GRAPH_BIT | PREDICATE_BIT);
    /// Graph and object fixed.
    pub const GO: Self = Self(GRAPH_BIT | OBJECT_BIT);
    /// Subject and predicate fixed.
    pub const SP: Self = Self(SUBJECT_BIT | PREDICATE_BIT);
    /// Subject and object fixed.
    pub const SO: Self = Self(SUBJECT_BIT | OBJECT_BIT);
    /// Predicate and object fixed.
    pub const PO: Self = Self(PREDICATE_BIT | OBJECT_BIT);
    /// Graph, subject, and predicate fixed.
    pub const GSP: Self = Self(GRAPH_BIT | SUBJECT_BIT | PREDICATE_BIT);
    /// Graph, subject, and object fixed.
    pub const GSO: Self = Self(GRAPH_BIT | SUBJECT_BIT | OBJECT_BIT);
    /// Graph, predicate, and object fixed.
    pub const GPO: Self = Self(GRAPH_BIT | PREDICATE_BIT | OBJECT_BIT);
    /// Subject, predicate, and object fixed.
    pub const SPO: Self = Self(SUBJECT_BIT | PREDICATE_BIT | OBJECT_BIT);
    /// All four fields fixed.
    pub const GSPO: Self = Self(GRAPH_BIT | SUBJECT_BIT | PREDICATE_BIT | OBJECT_BIT);

    /// The number of distinct shapes.
    pub const COUNT: usize = 16;

    /// Returns an iterator over all 16 shapes, in ascending bitmask order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0u8..16).map(Self)
    }

    /// Builds a shape from per-field fixed flags.
    #[must_use]
    pub const fn from_flags(graph: bool, subject: bool, predicate: bool, object: bool) -> Self {
        let mut bits = 0u8;
        if graph {
            bits |= GRAPH_BIT;
        }
        if subject {
            bits |= SUBJECT_BIT;
        }
        if predicate {
            bits |= PREDICATE_BIT;
        }
        if object {
            bits |= OBJECT_BIT;
        }
        Self(bits)
    }

    /// Whether the graph field is fixed.
    #[must_use]
    pub const fn fixes_graph(self) -> bool {
        self.0 & GRAPH_BIT != 0
    }

    /// Whether the subject field is fixed.
    #[must_use]
    pub const fn fixes_subject(self) -> bool {
        self.0 & SUBJECT_BIT != 0
    }

    /// Whether the predicate field is fixed.
    #[must_use]
    pub const fn fixes_predicate(self) -> bool {
        self.0 & PREDICATE_BIT != 0
    }

    /// Whether the object field is fixed.
    #[must_use]
    pub const fn fixes_object(self) -> bool {
        self.0 & OBJECT_BIT != 0
    }

    /// Number of fixed fields (0 to 4).
    #[must_use]
    pub const fn arity(self) -> u32 {
        self.0.count_ones()
    }

    /// The raw bitmask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Shape {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits < 16 {
            Ok(Self(bits))
        } else {
            Err(format!("shape bitmask out of range: {bits:#06b}"))
        }
    }
}

impl From<Shape> for u8 {
    fn from(shape: Shape) -> Self {
        shape.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.fixes_graph() { 'G' } else { '_' },
            if self.fixes_subject() { 'S' } else { '_' },
            if self.fixes_predicate() { 'P' } else { '_' },
            if self.fixes_object() { 'O' } else { '_' },
        )
    }
}
