//! Type-safe wrappers for diagram variables.
//!
//! A [`Var`] is the position of a variable in the manager's global order, which
//! is also the order used along every path of every diagram. Its meaning (the
//! key and the domain size) is described by an [`MddVariable`].
use std::fmt;

/// A variable identifier (0-indexed position in the manager's order).
///
/// # Invariants
///
/// - Smaller identifiers are tested closer to the root.
/// - Identifiers are only meaningful for the manager that issued them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given position.
    pub fn new(id: u32) -> Self {
        Var(id)
    }

    /// Returns the raw position as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the raw position as a `usize`, for indexing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

impl From<usize> for Var {
    fn from(index: usize) -> Self {
        Var(index as u32)
    }
}

/// Description of a variable known to a manager.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MddVariable {
    /// Name of the variable (the component id).
    pub key: String,
    /// Number of values in the domain (`max_value + 1`).
    pub nbval: u32,
}

impl MddVariable {
    pub fn new(key: impl Into<String>, nbval: u32) -> Self {
        assert!(nbval >= 2, "A variable needs at least two values");
        Self {
            key: key.into(),
            nbval,
        }
    }

    /// Creates a Boolean variable.
    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, 2)
    }

    pub fn max_value(&self) -> u32 {
        self.nbval - 1
    }

    pub fn is_boolean(&self) -> bool {
        self.nbval == 2
    }
}

impl fmt::Display for MddVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
