//! Type-safe wrappers for program atoms and registry nodes.
//!
//! This module provides newtype wrappers that enforce compile-time distinction
//! between solver atoms (the numbers written into the logic program) and
//! registry nodes (the variables and expressions built by the caller).
use std::fmt;

/// An atom of the generated logic program (1-indexed).
///
/// # Invariants
///
/// - Atom `1` is the reserved `_false` head of the smodels format and is never
///   allocated to a variable.
/// - Atom `2` is always true (see [`Atom::TRUE`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Atom(u32);

impl Atom {
    /// The `_false` atom, used as the head of integrity rules.
    pub const FALSE: Atom = Atom(1);

    /// The atom asserted by a fact in every program.
    pub const TRUE: Atom = Atom(2);

    /// Creates a new atom with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0` or if `id` does not fit into a signed literal.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Atom indices must be >= 1");
        assert!(id <= i32::MAX as u32, "Atom index {} is too large", id);
        Atom(id)
    }

    /// Returns the raw atom index.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Parses an atom from its symbol-table name (`v<index>`).
    pub fn from_name(name: &str) -> Option<Self> {
        let id: u32 = name.strip_prefix('v')?.parse().ok()?;
        if id < 2 || id > i32::MAX as u32 {
            return None;
        }
        Some(Atom(id))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<Atom> for u32 {
    fn from(atom: Atom) -> Self {
        atom.0
    }
}

/// Index of a node in the [`Registry`][crate::registry::Registry] arena.
///
/// Node ids are stable for the lifetime of the registry: nodes are never freed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The constant `true` node, present in every registry.
    pub const TRUE: NodeId = NodeId(0);

    pub fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a symbolic variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Multi,
    /// A boolean that is only true when proven (see [`Context::prove_if`][crate::context::Context::prove_if]).
    Atom,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Multi => "Multi",
            Kind::Atom => "Atom",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_atom_creation() {
        let a = Atom::new(3);
        let b = Atom::new(4);
        assert_eq!(a.id(), 3);
        assert!(a < b);
        assert_eq!(a.to_string(), "v3");
    }

    #[test]
    #[should_panic(expected = "Atom indices must be >= 1")]
    fn test_atom_zero_panics() {
        Atom::new(0);
    }

    #[test]
    fn test_atom_from_name() {
        assert_eq!(Atom::from_name("v42"), Some(Atom::new(42)));
        assert_eq!(Atom::from_name("v2"), Some(Atom::TRUE));
        assert_eq!(Atom::from_name("v1"), None);
        assert_eq!(Atom::from_name("x42"), None);
        assert_eq!(Atom::from_name("v"), None);
        assert_eq!(Atom::from_name("v-3"), None);
    }
}
