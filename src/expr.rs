//! Lazy expression trees.
//!
//! Operators on [`Var`] handles do not touch the solver state; they build an
//! [`Expr`] that is compiled when handed to a [`Context`][crate::Context]
//! (via [`Context::eval`][crate::Context::eval] or any method taking
//! `impl Into<Expr>`).
//!
//! ```ignore
//! let x = ctx.int_var();
//! let y = ctx.int_var();
//! ctx.require((x + y).equals(10))?;
//! ctx.require(x.gt(y) & !(x.equals(7)))?;
//! ```

use std::fmt::{self, Display};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Shl, Shr, Sub};

use crate::node::ShiftOp;
use crate::types::{Kind, NodeId};
use crate::value::Value;

/// Handle to a variable or compiled expression of a [`Context`][crate::Context].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Var {
    id: NodeId,
    kind: Kind,
}

impl Var {
    pub(crate) fn new(id: NodeId, kind: Kind) -> Self {
        Self { id, kind }
    }

    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> Kind {
        self.kind
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinOp {
    And,
    Or,
    Xor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Index,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Index => "[]",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(Var),
    /// A literal; its encoding adapts to the other operand.
    Const(Value),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Shift(ShiftOp, Box<Expr>, u32),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Expr::Binary(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn equals(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Eq, self, rhs)
    }

    pub fn not_equals(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Ne, self, rhs)
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Lt, self, rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Le, self, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Gt, self, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Ge, self, rhs)
    }

    /// Element (or character) at `index` of a sequence-valued Multi.
    pub fn at(self, index: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Index, self, index)
    }
}

/// `pred ? cons : alt`.
pub fn cond(pred: impl Into<Expr>, cons: impl Into<Expr>, alt: impl Into<Expr>) -> Expr {
    Expr::Cond(Box::new(pred.into()), Box::new(cons.into()), Box::new(alt.into()))
}

impl Var {
    pub fn equals(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).equals(rhs)
    }

    pub fn not_equals(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).not_equals(rhs)
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).lt(rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).le(rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).gt(rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).ge(rhs)
    }

    pub fn at(self, index: impl Into<Expr>) -> Expr {
        Expr::from(self).at(index)
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::Var(var)
    }
}

impl From<&Var> for Expr {
    fn from(var: &Var) -> Self {
        Expr::Var(*var)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Const(value)
    }
}

macro_rules! impl_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Expr::Const(Value::from(value))
                }
            }
        )*
    };
}

impl_from_literal!(bool, i32, i64, u32, &str, String);

macro_rules! impl_binary_ops {
    ($lhs:ty) => {
        impl_binary_ops!(@op $lhs, BitAnd, bitand, BinOp::And);
        impl_binary_ops!(@op $lhs, BitOr, bitor, BinOp::Or);
        impl_binary_ops!(@op $lhs, BitXor, bitxor, BinOp::Xor);
        impl_binary_ops!(@op $lhs, Add, add, BinOp::Add);
        impl_binary_ops!(@op $lhs, Sub, sub, BinOp::Sub);
        impl_binary_ops!(@op $lhs, Mul, mul, BinOp::Mul);
        impl_binary_ops!(@op $lhs, Div, div, BinOp::Div);

        impl Not for $lhs {
            type Output = Expr;

            fn not(self) -> Self::Output {
                Expr::Not(Box::new(self.into()))
            }
        }

        impl Shl<u32> for $lhs {
            type Output = Expr;

            fn shl(self, amount: u32) -> Self::Output {
                Expr::Shift(ShiftOp::Left, Box::new(self.into()), amount)
            }
        }

        impl Shr<u32> for $lhs {
            type Output = Expr;

            fn shr(self, amount: u32) -> Self::Output {
                Expr::Shift(ShiftOp::Right, Box::new(self.into()), amount)
            }
        }
    };
    (@op $lhs:ty, $trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Expr>> $trait<R> for $lhs {
            type Output = Expr;

            fn $method(self, rhs: R) -> Self::Output {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

impl_binary_ops!(Var);
impl_binary_ops!(Expr);
