//! Map logic for a single-shape store.

use std::collections::{HashMap, HashSet};

use crate::error::ShapeMismatch;
use crate::pattern::Pattern;
use crate::quad::Quad;
use crate::shape::Shape;

/// What a retrieval does when the exact key is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// Produce nothing (`QueryRef` semantics).
    Silent,
    /// Produce a single failure signal carrying the pattern (`QueryIf`).
    ReportMiss,
}

/// Outcome of a retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    /// The key was present; its quads, in unspecified order.
    Matches(Vec<Quad>),
    /// The key was absent and the policy was [`MissPolicy::Silent`].
    Miss,
    /// The key was absent and the policy was [`MissPolicy::ReportMiss`].
    Failure(Pattern),
}

/// The mapping from one shape's bound values to the quads sharing them.
///
/// Every key in the map is a pattern of the store's own shape; `store`
/// derives the key itself, so the invariant holds by construction, and
/// `retrieve` rejects foreign-shape keys before touching the map.
#[derive(Debug)]
pub struct StoreState {
    shape: Shape,
    entries: HashMap<Pattern, HashSet<Quad>>,
}

impl StoreState {
    /// Creates an empty store for one shape.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            entries: HashMap::new(),
        }
    }

    /// The shape this store indexes under.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Indexes a quad under this store's projection of it.
    ///
    /// Always succeeds. Returns true if the quad was not already present
    /// under its key (set semantics, not a counter).
    pub fn store(&mut self, quad: Quad) -> bool {
        let key = Pattern::project(self.shape, &quad);
        self.entries.entry(key).or_default().insert(quad)
    }

    /// Looks up the exact key `pattern` and applies `on_miss` if absent.
    ///
    /// # Errors
    /// Returns [`ShapeMismatch`] when the pattern is not of this store's
    /// shape; the map is left untouched.
    pub fn retrieve(
        &self,
        pattern: &Pattern,
        on_miss: MissPolicy,
    ) -> Result<Retrieval, ShapeMismatch> {
        let got = pattern.shape();
        if got != self.shape {
            return Err(ShapeMismatch {
                expected: self.shape,
                got,
            });
        }

        match self.entries.get(pattern) {
            Some(quads) => Ok(Retrieval::Matches(quads.iter().cloned().collect())),
            None => match on_miss {
                MissPolicy::Silent => Ok(Retrieval::Miss),
                MissPolicy::ReportMiss => Ok(Retrieval::Failure(pattern.clone())),
            },
        }
    }

    /// Every key currently present, in unspecified order.
    #[must_use]
    pub fn known_patterns(&self) -> Vec<Pattern> {
        self.entries.keys().cloned().collect()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of quads across all keys.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    /// Whether the store holds no quads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
