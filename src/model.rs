//! Answer sets and decoding of encodings into values.

use crate::idset::AtomSet;
use crate::lit::Lit;
use crate::node::Encoding;
use crate::types::Atom;
use crate::value::Value;

/// The set of atoms that are true in an answer set.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Model {
    atoms: AtomSet,
}

impl Model {
    /// The always-true atom is included regardless of `atoms`.
    pub fn from_atoms(atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut set: AtomSet = atoms.into_iter().collect();
        set.insert(Atom::TRUE);
        Self { atoms: set }
    }

    pub fn contains(&self, atom: Atom) -> bool {
        self.atoms.contains(atom)
    }

    pub fn lit_value(&self, lit: Lit) -> bool {
        self.contains(lit.atom()) != lit.is_negated()
    }

    /// True atoms in increasing order.
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.atoms.iter()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Reads back the value of an encoding.
    ///
    /// Integers are the sum of their set bits. A Multi yields its first true
    /// value literal, or `None` if none holds.
    pub fn decode(&self, encoding: &Encoding) -> Option<Value> {
        match encoding {
            Encoding::Bool(lit) => Some(Value::Bool(self.lit_value(*lit))),
            Encoding::Int(bits) => {
                let n = bits
                    .iter()
                    .enumerate()
                    .filter(|&(_, &bit)| self.lit_value(bit))
                    .fold(0i64, |acc, (i, _)| acc | (1 << i));
                Some(Value::Int(n))
            }
            Encoding::Multi(values) => values
                .iter()
                .find(|(_, lit)| self.lit_value(*lit))
                .map(|(value, _)| value.clone()),
        }
    }
}
