//! Debug utilities for inspecting variables.

use std::fmt::{self, Display};

use crate::lit::Lit;
use crate::node::Encoding;
use crate::types::Kind;
use crate::value::Value;

/// Kind, atoms and decoded value of a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    pub kind: Kind,
    pub encoding: Encoding,
    /// Value in the last model (None before the first satisfiable solve).
    pub value: Option<Value>,
}

struct ShowLit(Lit);

impl Display for ShowLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Lit::TRUE => write!(f, "1"),
            Lit::FALSE => write!(f, "0"),
            lit if lit.is_negated() => write!(f, "-{}", lit.atom()),
            lit => write!(f, "{}", lit.atom()),
        }
    }
}

impl Display for VarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        match &self.encoding {
            Encoding::Bool(lit) => write!(f, "{}", ShowLit(*lit))?,
            // Most significant bit first
            Encoding::Int(bits) => {
                for (i, bit) in bits.iter().rev().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", ShowLit(*bit))?;
                }
            }
            Encoding::Multi(values) => {
                for (i, (value, lit)) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", value, ShowLit(*lit))?;
                }
            }
        }
        write!(f, "]=")?;
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "?"),
        }
    }
}
