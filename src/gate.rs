use crate::lit::Lit;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryType {
    And,
    Or,
    Xor,
    Eq,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TernaryType {
    Ite,
}

/// Structural key of a boolean gate, used for hash-consing.
///
/// Inputs of symmetric gates are stored sorted, so `and(a, b)` and `and(b, a)`
/// share one key.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Gate {
    Binary(BinaryType, [Lit; 2]),
    Ternary(TernaryType, [Lit; 3]),
}

// Constructors
impl Gate {
    fn symmetric(t: BinaryType, a: Lit, b: Lit) -> Gate {
        if a <= b {
            Gate::Binary(t, [a, b])
        } else {
            Gate::Binary(t, [b, a])
        }
    }

    pub fn and(a: Lit, b: Lit) -> Gate {
        Gate::symmetric(BinaryType::And, a, b)
    }

    pub fn or(a: Lit, b: Lit) -> Gate {
        Gate::symmetric(BinaryType::Or, a, b)
    }

    pub fn xor(a: Lit, b: Lit) -> Gate {
        Gate::symmetric(BinaryType::Xor, a, b)
    }

    pub fn eq(a: Lit, b: Lit) -> Gate {
        Gate::symmetric(BinaryType::Eq, a, b)
    }

    pub fn ite(a: Lit, b: Lit, c: Lit) -> Gate {
        Gate::Ternary(TernaryType::Ite, [a, b, c])
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::Atom;

    #[test]
    fn test_gate_and_is_symmetric() {
        let a = Lit::positive(Atom::new(3));
        let b = Lit::negative(Atom::new(4));
        assert_eq!(Gate::and(a, b), Gate::and(b, a));
        assert_eq!(Gate::and(a, b), Gate::Binary(BinaryType::And, [a, b]));
    }

    #[test]
    fn test_gate_ite_is_ordered() {
        let a = Lit::positive(Atom::new(3));
        let b = Lit::positive(Atom::new(4));
        let c = Lit::positive(Atom::new(5));
        assert_eq!(Gate::ite(a, b, c), Gate::Ternary(TernaryType::Ite, [a, b, c]));
        assert_ne!(Gate::ite(a, b, c), Gate::ite(b, a, c));
    }

    #[test]
    fn test_gate_types_differ() {
        let a = Lit::positive(Atom::new(3));
        let b = Lit::positive(Atom::new(4));
        assert_ne!(Gate::and(a, b), Gate::or(a, b));
        assert_ne!(Gate::xor(a, b), Gate::eq(a, b));
    }
}
