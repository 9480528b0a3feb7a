//! Compilation of [`Expr`] trees into registry nodes.
//!
//! Literals carry no kind of their own: a constant next to a Multi operand
//! becomes a single-valued Multi, otherwise it becomes a Bool or Int constant.
//! Once both operands are nodes, their kinds select the encoder:
//!
//! - Multi with Multi: one-hot encoder;
//! - Multi with anything else: [`Error::KindMismatch`];
//! - any Int operand: integer encoder (Bool operands are coerced to `0`/`1`);
//! - otherwise: boolean gates.

use log::debug;

use crate::error::{Error, Result};
use crate::expr::{BinOp, Expr};
use crate::node::{ArithOp, CmpOp, Domain, LogicOp};
use crate::registry::Registry;
use crate::types::{Kind, NodeId};
use crate::value::{Value, ValueOp};

enum Operand {
    Node(NodeId),
    Const(Value),
}

impl Registry {
    pub fn eval(&mut self, expr: &Expr) -> Result<NodeId> {
        match self.compile(expr)? {
            Operand::Node(id) => Ok(id),
            Operand::Const(value) => self.materialize(value, None),
        }
    }

    fn compile(&mut self, expr: &Expr) -> Result<Operand> {
        let id = match expr {
            Expr::Var(var) => {
                let node = self.check(var.id())?;
                if node.kind != var.kind() {
                    return Err(Error::UnknownVar);
                }
                var.id()
            }
            Expr::Const(value) => return Ok(Operand::Const(value.clone())),
            Expr::Not(inner) => {
                let id = self.eval(inner)?;
                self.not(id)?
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.compile(lhs)?;
                let rhs = self.compile(rhs)?;
                let (a, b) = self.coerce(lhs, rhs)?;
                self.binary(*op, a, b)?
            }
            Expr::Shift(op, inner, amount) => {
                let id = self.eval(inner)?;
                self.shift(*op, id, *amount)?
            }
            Expr::Cond(pred, cons, alt) => {
                let pred = self.eval(pred)?;
                let cons = self.compile(cons)?;
                let alt = self.compile(alt)?;
                let (cons, alt) = self.coerce(cons, alt)?;
                let domain = self.domain("cond", cons, alt)?;
                self.cond(domain, pred, cons, alt)?
            }
        };
        Ok(Operand::Node(id))
    }

    /// Turns a literal into a node, shaped after a neighbouring operand of kind `like`.
    fn materialize(&mut self, value: Value, like: Option<Kind>) -> Result<NodeId> {
        if like == Some(Kind::Multi) {
            return Ok(self.multi_const(value));
        }
        match value {
            Value::Bool(b) => Ok(self.bool_const(b)),
            Value::Int(n) if n < 0 => Err(Error::OutOfRange {
                value: i128::from(n),
                bits: self.bits(),
            }),
            Value::Int(n) => self.int_const(n as u64),
            value @ (Value::Str(_) | Value::Seq(_)) => Ok(self.multi_const(value)),
        }
    }

    fn coerce(&mut self, lhs: Operand, rhs: Operand) -> Result<(NodeId, NodeId)> {
        match (lhs, rhs) {
            (Operand::Node(a), Operand::Node(b)) => Ok((a, b)),
            (Operand::Node(a), Operand::Const(v)) => {
                let kind = self.node(a).kind;
                Ok((a, self.materialize(v, Some(kind))?))
            }
            (Operand::Const(v), Operand::Node(b)) => {
                let kind = self.node(b).kind;
                Ok((self.materialize(v, Some(kind))?, b))
            }
            (Operand::Const(x), Operand::Const(y)) => {
                // A string or sequence on either side makes both Multi constants
                let like = if is_sequence(&x) || is_sequence(&y) { Some(Kind::Multi) } else { None };
                let a = self.materialize(x, like)?;
                let kind = self.node(a).kind;
                Ok((a, self.materialize(y, Some(kind))?))
            }
        }
    }

    /// The encoder domain for a pair of operands.
    pub fn domain(&self, op: &'static str, a: NodeId, b: NodeId) -> Result<Domain> {
        let lhs = self.check(a)?.kind;
        let rhs = self.check(b)?.kind;
        match (lhs, rhs) {
            (Kind::Multi, Kind::Multi) => Ok(Domain::Multi),
            (Kind::Multi, _) | (_, Kind::Multi) => Err(Error::KindMismatch { op, lhs, rhs }),
            (Kind::Int, _) | (_, Kind::Int) => Ok(Domain::Int),
            _ => Ok(Domain::Bool),
        }
    }

    /// Applies a binary operator to two nodes.
    pub fn binary(&mut self, op: BinOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("binary({}, {}, {})", op.symbol(), a, b);
        let domain = self.domain(op.symbol(), a, b)?;
        match op {
            BinOp::And => self.logic(LogicOp::And, a, b),
            BinOp::Or => self.logic(LogicOp::Or, a, b),
            BinOp::Xor => self.logic(LogicOp::Xor, a, b),
            BinOp::Eq => self.compare(domain, CmpOp::Eq, a, b),
            BinOp::Ne => {
                let eq = self.compare(domain, CmpOp::Eq, a, b)?;
                self.not(eq)
            }
            BinOp::Gt => self.compare(domain, CmpOp::Gt, a, b),
            BinOp::Lt => self.compare(domain, CmpOp::Gt, b, a),
            BinOp::Ge => {
                let lt = self.compare(domain, CmpOp::Gt, b, a)?;
                self.not(lt)
            }
            BinOp::Le => {
                let gt = self.compare(domain, CmpOp::Gt, a, b)?;
                self.not(gt)
            }
            BinOp::Add => self.arith(domain, ArithOp::Add, a, b),
            BinOp::Sub => self.arith(domain, ArithOp::Sub, a, b),
            BinOp::Mul => self.arith(domain, ArithOp::Mul, a, b),
            BinOp::Div | BinOp::Index => {
                if domain != Domain::Multi {
                    return Err(Error::UnexpectedKind {
                        expected: Kind::Multi,
                        found: self.node(a).kind,
                    });
                }
                let op = if op == BinOp::Div { ValueOp::Div } else { ValueOp::Index };
                self.multi_lift(op, a, b)
            }
        }
    }

    fn compare(&mut self, domain: Domain, op: CmpOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        match domain {
            Domain::Bool => self.bool_compare(op, a, b),
            Domain::Int => self.int_compare(op, a, b),
            Domain::Multi => self.multi_compare(op, a, b),
        }
    }

    fn arith(&mut self, domain: Domain, op: ArithOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        match domain {
            Domain::Multi => {
                let op = match op {
                    ArithOp::Add => ValueOp::Add,
                    ArithOp::Sub => ValueOp::Sub,
                    ArithOp::Mul => ValueOp::Mul,
                };
                self.multi_lift(op, a, b)
            }
            Domain::Bool | Domain::Int => self.int_arith(op, a, b),
        }
    }
}

fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::Seq(_))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::expr::{cond, Var};
    use crate::node::Encoding;

    fn var(reg: &Registry, id: NodeId) -> Var {
        Var::new(id, reg.node(id).kind)
    }

    #[test]
    fn test_eval_var() {
        let mut reg = Registry::new(4);
        let x = reg.int_var();
        let res = reg.eval(&Expr::from(var(&reg, x))).unwrap();
        assert_eq!(res, x);
    }

    #[test]
    fn test_eval_not_var() {
        let mut reg = Registry::new(4);
        let a = reg.bool_var();
        let na = reg.not(a).unwrap();
        let res = reg.eval(&!var(&reg, a)).unwrap();
        assert_eq!(res, na);
    }

    #[test]
    fn test_eval_matches_direct_calls() {
        let mut reg = Registry::new(4);
        let x = reg.int_var();
        let y = reg.int_var();
        let direct = reg.int_arith(ArithOp::Add, x, y).unwrap();
        let (vx, vy) = (var(&reg, x), var(&reg, y));
        assert_eq!(reg.eval(&(vx + vy)).unwrap(), direct);
        assert_eq!(reg.eval(&(vy + vx)).unwrap(), direct);
    }

    #[test]
    fn test_lt_is_swapped_gt() {
        let mut reg = Registry::new(4);
        let x = reg.int_var();
        let y = reg.int_var();
        let (vx, vy) = (var(&reg, x), var(&reg, y));
        let lt = reg.eval(&vx.lt(vy)).unwrap();
        let gt = reg.eval(&vy.gt(vx)).unwrap();
        assert_eq!(lt, gt);
    }

    #[test]
    fn test_literal_adapts_to_int() {
        let mut reg = Registry::new(4);
        let x = reg.int_var();
        let five = reg.int_const(5).unwrap();
        let direct = reg.int_compare(CmpOp::Eq, x, five).unwrap();
        let vx = var(&reg, x);
        assert_eq!(reg.eval(&vx.equals(5)).unwrap(), direct);
        assert!(matches!(
            reg.eval(&vx.equals(-1)),
            Err(Error::OutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn test_literal_adapts_to_multi() {
        let mut reg = Registry::new(4);
        let m = reg.multi_var(vec!["red".into(), "green".into()]).unwrap();
        let vm = var(&reg, m);
        let eq = reg.eval(&vm.equals("red")).unwrap();
        assert_eq!(reg.node(eq).kind, Kind::Bool);
        let plus = reg.eval(&(vm + "!")).unwrap();
        let values: Vec<Value> = reg.multi_values(plus).unwrap().into_iter().map(|(v, _)| v).collect();
        assert_eq!(values, vec![Value::from("green!"), Value::from("red!")]);
    }

    #[test]
    fn test_kind_mismatch() {
        let mut reg = Registry::new(4);
        let x = reg.int_var();
        let m = reg.multi_var(vec![1.into(), 2.into()]).unwrap();
        let (vx, vm) = (var(&reg, x), var(&reg, m));
        assert!(matches!(
            reg.eval(&(vx + vm)),
            Err(Error::KindMismatch { op: "+", lhs: Kind::Int, rhs: Kind::Multi })
        ));
        assert!(matches!(
            reg.eval(&(vx / 2)),
            Err(Error::UnexpectedKind { expected: Kind::Multi, found: Kind::Int })
        ));
    }

    #[test]
    fn test_bool_arithmetic_is_integer() {
        let mut reg = Registry::new(4);
        let a = reg.bool_var();
        let b = reg.bool_var();
        let (va, vb) = (var(&reg, a), var(&reg, b));
        let sum = reg.eval(&(va + vb)).unwrap();
        assert_eq!(reg.node(sum).kind, Kind::Int);
    }

    #[test]
    fn test_cond_domains() {
        let mut reg = Registry::new(4);
        let p = reg.bool_var();
        let vp = var(&reg, p);
        let int = reg.eval(&cond(vp, 3, 5)).unwrap();
        assert_eq!(reg.node(int).kind, Kind::Int);
        let multi = reg.eval(&cond(vp, "yes", "no")).unwrap();
        assert_eq!(reg.node(multi).kind, Kind::Multi);
        let constant = reg.eval(&cond(true, 3, 5)).unwrap();
        let three = reg.int_const(3).unwrap();
        assert_eq!(reg.encoding(constant), reg.encoding(three));
    }

    #[test]
    fn test_cond_mixed_literals_are_multi() {
        let mut reg = Registry::new(4);
        let p = reg.bool_var();
        let vp = var(&reg, p);
        for expr in [cond(vp, 3, "x"), cond(vp, "x", 3)] {
            let res = reg.eval(&expr).unwrap();
            assert_eq!(reg.node(res).kind, Kind::Multi);
            let values: Vec<Value> = reg.multi_values(res).unwrap().into_iter().map(|(v, _)| v).collect();
            assert_eq!(values, vec![Value::Int(3), Value::from("x")]);
        }
        let never = reg.eval(&Expr::from(3).equals("x")).unwrap();
        assert_eq!(reg.encoding(never), &Encoding::Bool(crate::lit::Lit::FALSE));
    }

    #[test]
    fn test_constant_folding() {
        let mut reg = Registry::new(4);
        let res = reg.eval(&Expr::from(2).gt(1)).unwrap();
        assert_eq!(reg.encoding(res), &Encoding::Bool(crate::lit::Lit::TRUE));
    }
}
