//! Concrete values: the domains of multi-valued variables and the decoded
//! results of a solve.

use std::fmt::{self, Display, Formatter};

/// A concrete value.
///
/// Values are totally ordered so that domains (and therefore encodings) are
/// deterministic.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Seq(Vec<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Str(_) => "Str",
            Value::Seq(_) => "Seq",
        }
    }
}

/// Binary operations on concrete values, lifted pointwise to multi-valued variables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueOp {
    Add,
    Sub,
    Mul,
    Div,
    Index,
}

impl ValueOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ValueOp::Add => "+",
            ValueOp::Sub => "-",
            ValueOp::Mul => "*",
            ValueOp::Div => "/",
            ValueOp::Index => "[]",
        }
    }

    /// Applies the operation, returning `None` where it is undefined.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Option<Value> {
        use Value::*;
        match (self, lhs, rhs) {
            (ValueOp::Add, Int(a), Int(b)) => a.checked_add(*b).map(Int),
            (ValueOp::Add, Str(a), Str(b)) => Some(Str(format!("{}{}", a, b))),
            (ValueOp::Add, Seq(a), Seq(b)) => Some(Seq(a.iter().chain(b).cloned().collect())),
            (ValueOp::Sub, Int(a), Int(b)) => a.checked_sub(*b).map(Int),
            (ValueOp::Mul, Int(a), Int(b)) => a.checked_mul(*b).map(Int),
            (ValueOp::Div, Int(a), Int(b)) => floor_div(*a, *b).map(Int),
            (ValueOp::Index, Seq(items), Int(i)) => {
                let i = usize::try_from(*i).ok()?;
                items.get(i).cloned()
            }
            (ValueOp::Index, Str(s), Int(i)) => {
                let i = usize::try_from(*i).ok()?;
                s.chars().nth(i).map(|c| Str(c.to_string()))
            }
            _ => None,
        }
    }
}

/// Integer division rounding towards negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Ordering predicate on values of the same type; `None` when incomparable.
pub fn greater_than(lhs: &Value, rhs: &Value) -> Option<bool> {
    if lhs.type_name() != rhs.type_name() {
        return None;
    }
    Some(lhs > rhs)
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", *b as u8),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}
