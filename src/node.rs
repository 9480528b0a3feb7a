use crate::lit::Lit;
use crate::rule::Rule;
use crate::types::{Kind, NodeId};
use crate::value::{Value, ValueOp};

/// The compiled atoms of a node.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Encoding {
    /// A single literal (Bool and Atom variables).
    Bool(Lit),
    /// One literal per bit, least significant bit first.
    Int(Box<[Lit]>),
    /// One literal per possible value, sorted by value.
    Multi(Box<[(Value, Lit)]>),
}

impl Encoding {
    /// All literals of the encoding.
    pub fn lits(&self) -> Vec<Lit> {
        match self {
            Encoding::Bool(lit) => vec![*lit],
            Encoding::Int(bits) => bits.to_vec(),
            Encoding::Multi(vals) => vals.iter().map(|(_, lit)| *lit).collect(),
        }
    }
}

/// The operand domain an operator was compiled in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Domain {
    Bool,
    Int,
    Multi,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

/// Canonical comparisons: `<` is stored as a swapped `>`, and `!=`, `<=`, `>=`
/// are negations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CmpOp {
    Eq,
    Gt,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShiftOp {
    Left,
    Right,
}

/// Structural identity of a derived node: operator, operand ids and literal parameters.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Int(u64),
    Value(Value),
    Not(NodeId),
    /// Conversion of a Bool or Int node to "is non-zero".
    Truth(NodeId),
    Logic(LogicOp, NodeId, NodeId),
    Compare(Domain, CmpOp, NodeId, NodeId),
    Arith(ArithOp, NodeId, NodeId),
    Lift(ValueOp, NodeId, NodeId),
    Shift(ShiftOp, NodeId, u32),
    Cond(Domain, NodeId, NodeId, NodeId),
    AtLeast(u32, Box<[NodeId]>),
    AllDiff(Box<[NodeId]>),
    Derive(NodeId, NodeId),
}

impl Key {
    /// Orders the operands of commutative operators.
    pub fn canonical(self) -> Key {
        fn sorted(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        }

        match self {
            Key::Logic(op, a, b) => {
                let (a, b) = sorted(a, b);
                Key::Logic(op, a, b)
            }
            Key::Compare(domain, CmpOp::Eq, a, b) => {
                let (a, b) = sorted(a, b);
                Key::Compare(domain, CmpOp::Eq, a, b)
            }
            Key::Arith(op @ (ArithOp::Add | ArithOp::Mul), a, b) => {
                let (a, b) = sorted(a, b);
                Key::Arith(op, a, b)
            }
            Key::AtLeast(n, mut ids) => {
                ids.sort();
                Key::AtLeast(n, ids)
            }
            Key::AllDiff(mut ids) => {
                ids.sort();
                Key::AllDiff(ids)
            }
            key => key,
        }
    }
}

/// A variable or expression in the registry.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: Kind,
    /// `None` for fresh variables, which are never shared.
    pub key: Option<Key>,
    pub encoding: Encoding,
    /// Rules defining the atoms this node allocated.
    pub rules: Vec<Rule>,
    /// Nodes whose rules this node relies on.
    pub deps: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: Kind, key: Option<Key>) -> Self {
        Self {
            kind,
            key,
            encoding: Encoding::Bool(Lit::FALSE),
            rules: Vec::new(),
            deps: Vec::new(),
        }
    }

    /// The single literal of a Bool or Atom node.
    pub fn lit(&self) -> Option<Lit> {
        match self.encoding {
            Encoding::Bool(lit) => Some(lit),
            _ => None,
        }
    }
}
