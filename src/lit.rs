use std::fmt::{Display, Formatter};
use std::ops::{Neg, Not};

use crate::types::Atom;

/// A signed reference to an [`Atom`].
///
/// Positive literals denote the atom itself, negative literals denote its
/// default negation (`not vN`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(i32);

impl Lit {
    /// The always-true literal.
    pub const TRUE: Lit = Lit(Atom::TRUE.id() as i32);
    /// The always-false literal.
    pub const FALSE: Lit = Lit(-(Atom::TRUE.id() as i32));

    pub fn positive(atom: Atom) -> Self {
        Self(atom.id() as i32)
    }

    pub fn negative(atom: Atom) -> Self {
        Self(-(atom.id() as i32))
    }

    pub const fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Return the internal representation of the literal.
    pub const fn get(self) -> i32 {
        self.0
    }

    pub fn atom(self) -> Atom {
        Atom::new(self.0.unsigned_abs())
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl From<bool> for Lit {
    fn from(b: bool) -> Self {
        if b {
            Lit::TRUE
        } else {
            Lit::FALSE
        }
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "not ")?;
        }
        write!(f, "{}", self.atom())
    }
}
