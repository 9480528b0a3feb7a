//! Boolean and integer encoders.
//!
//! Integers are vectors of `bits` literals, least significant bit first, and
//! always denote values in `[0, 2^bits - 1]`. Arithmetic never wraps around:
//! assignments that would overflow (or, for subtraction, go below zero) are
//! excluded by integrity rules owned by the expression node, whether or not the
//! result is used anywhere else.

use log::debug;

use crate::error::{Error, Result};
use crate::lit::Lit;
use crate::node::{ArithOp, CmpOp, Domain, Encoding, Key, LogicOp, ShiftOp};
use crate::registry::Registry;
use crate::types::{Kind, NodeId};

// Bit-level circuits
impl Registry {
    pub fn const_bits(&self, value: u64) -> Vec<Lit> {
        (0..self.bits())
            .map(|i| Lit::from((value >> i) & 1 == 1))
            .collect()
    }

    pub fn eq_bits(&mut self, a: &[Lit], b: &[Lit]) -> Lit {
        let eqs: Vec<Lit> = a.iter().zip(b).map(|(&x, &y)| self.eq(x, y)).collect();
        self.and_many(eqs)
    }

    /// Comparator `a > b`: a higher bit that differs overrides all lower ones.
    pub fn gt_bits(&mut self, a: &[Lit], b: &[Lit]) -> Lit {
        let mut res = Lit::FALSE;
        for (&x, &y) in a.iter().zip(b) {
            let greater = self.gt(x, y);
            let less = self.gt(y, x);
            let tie = self.ite(less, Lit::FALSE, res);
            res = self.ite(greater, Lit::TRUE, tie);
        }
        res
    }

    /// Ripple-carry adder; the final carry is forbidden.
    pub fn add_bits(&mut self, a: &[Lit], b: &[Lit]) -> Vec<Lit> {
        let mut carry = Lit::FALSE;
        let mut out = Vec::with_capacity(a.len());
        for (&x, &y) in a.iter().zip(b) {
            let d = self.xor(x, y);
            out.push(self.xor(d, carry));
            let both = self.and(x, y);
            let propagated = self.and(d, carry);
            carry = self.or(both, propagated);
        }
        self.forbid(carry);
        out
    }

    /// Borrow-chain subtractor `a - b`; the final borrow is forbidden, so `b <= a`.
    pub fn sub_bits(&mut self, a: &[Lit], b: &[Lit]) -> Vec<Lit> {
        let mut borrow = Lit::FALSE;
        let mut out = Vec::with_capacity(a.len());
        for (&x, &y) in a.iter().zip(b) {
            let d = self.xor(x, y);
            out.push(self.xor(d, borrow));
            let direct = self.and(-x, y);
            let propagated = self.and(-d, borrow);
            borrow = self.or(direct, propagated);
        }
        self.forbid(borrow);
        out
    }

    /// Shift-and-add multiplier; bits shifted out of the width are forbidden.
    pub fn mul_bits(&mut self, a: &[Lit], b: &[Lit]) -> Vec<Lit> {
        let n = a.len();
        let mut acc = vec![Lit::FALSE; n];
        for (i, &y) in b.iter().enumerate() {
            if y == Lit::FALSE {
                continue;
            }
            for &x in &a[n - i..] {
                let lost = self.and(y, x);
                self.forbid(lost);
            }
            let mut partial = vec![Lit::FALSE; i];
            for &x in &a[..n - i] {
                partial.push(self.and(y, x));
            }
            acc = self.add_bits(&acc, &partial);
        }
        acc
    }
}

// Operand access
impl Registry {
    /// Bits of an Int node, or of a Bool node coerced to `0`/`1`.
    pub fn int_bits(&self, id: NodeId) -> Result<Vec<Lit>> {
        let node = self.check(id)?;
        match &node.encoding {
            Encoding::Int(bits) => Ok(bits.to_vec()),
            Encoding::Bool(lit) => {
                let mut bits = vec![Lit::FALSE; self.bits() as usize];
                bits[0] = *lit;
                Ok(bits)
            }
            Encoding::Multi(_) => Err(Error::UnexpectedKind {
                expected: Kind::Int,
                found: node.kind,
            }),
        }
    }

    /// The boolean view of a node: itself for Bool/Atom, "non-zero" for Int.
    pub fn truth(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.check(id)?;
        match node.kind {
            Kind::Bool | Kind::Atom => Ok(id),
            Kind::Int => {
                let bits = self.int_bits(id)?;
                self.intern(Kind::Bool, Some(Key::Truth(id)), |reg| {
                    reg.depend(id);
                    Ok(Encoding::Bool(reg.or_many(bits)))
                })
            }
            Kind::Multi => Err(Error::UnexpectedKind {
                expected: Kind::Bool,
                found: Kind::Multi,
            }),
        }
    }
}

// Variables and constants
impl Registry {
    pub fn bool_var(&mut self) -> NodeId {
        debug!("bool_var()");
        self.fresh(Kind::Bool, |reg| Encoding::Bool(reg.choice()))
    }

    pub fn int_var(&mut self) -> NodeId {
        debug!("int_var(bits = {})", self.bits());
        let n = self.bits();
        self.fresh(Kind::Int, |reg| {
            let bits: Vec<Lit> = (0..n).map(|_| reg.choice()).collect();
            Encoding::Int(bits.into())
        })
    }

    pub fn bool_const(&mut self, value: bool) -> NodeId {
        if value {
            NodeId::TRUE
        } else {
            self.constant(Kind::Bool, Key::Not(NodeId::TRUE), Encoding::Bool(Lit::FALSE))
        }
    }

    fn check_value(&self, value: u64) -> Result<()> {
        if value >> self.bits() != 0 {
            return Err(Error::OutOfRange {
                value: i128::from(value),
                bits: self.bits(),
            });
        }
        Ok(())
    }

    pub fn int_const(&mut self, value: u64) -> Result<NodeId> {
        self.check_value(value)?;
        let bits = self.const_bits(value);
        Ok(self.constant(Kind::Int, Key::Int(value), Encoding::Int(bits.into())))
    }

    /// Integer in `lo..=hi`. Bits above the highest bit of `hi` are constant zero.
    pub fn int_range(&mut self, lo: u64, hi: u64) -> Result<NodeId> {
        debug!("int_range(lo = {}, hi = {})", lo, hi);
        if lo > hi {
            return Err(Error::InvalidRange { lo, hi });
        }
        self.check_value(hi)?;
        let n = self.bits();
        let lo_bits = self.const_bits(lo);
        let hi_bits = self.const_bits(hi);
        Ok(self.fresh(Kind::Int, |reg| {
            let bits: Vec<Lit> = (0..n)
                .map(|i| if hi >> i == 0 { Lit::FALSE } else { reg.choice() })
                .collect();
            let above = reg.gt_bits(&bits, &hi_bits);
            reg.forbid(above);
            let below = reg.gt_bits(&lo_bits, &bits);
            reg.forbid(below);
            Encoding::Int(bits.into())
        }))
    }

    /// Integer restricted to one of `values`.
    pub fn int_in(&mut self, values: &[u64]) -> Result<NodeId> {
        debug!("int_in(values = {:?})", values);
        if values.is_empty() {
            return Err(Error::EmptyDomain);
        }
        for &v in values {
            self.check_value(v)?;
        }
        let n = self.bits();
        let consts: Vec<Vec<Lit>> = values.iter().map(|&v| self.const_bits(v)).collect();
        Ok(self.fresh(Kind::Int, |reg| {
            let bits: Vec<Lit> = (0..n).map(|_| reg.choice()).collect();
            let matches: Vec<Lit> = consts.iter().map(|c| reg.eq_bits(&bits, c)).collect();
            let any = reg.or_many(matches);
            reg.forbid(-any);
            Encoding::Int(bits.into())
        }))
    }
}

// Boolean operators
impl Registry {
    pub fn not(&mut self, id: NodeId) -> Result<NodeId> {
        let id = self.truth(id)?;
        if let Some(Key::Not(inner)) = &self.node(id).key {
            return Ok(*inner);
        }
        let lit = self.bool_lit(id)?;
        self.intern(Kind::Bool, Some(Key::Not(id)), |reg| {
            reg.depend(id);
            Ok(Encoding::Bool(-lit))
        })
    }

    pub fn logic(&mut self, op: LogicOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("logic({:?}, {}, {})", op, a, b);
        let a = self.truth(a)?;
        let b = self.truth(b)?;
        let x = self.bool_lit(a)?;
        let y = self.bool_lit(b)?;
        self.intern(Kind::Bool, Some(Key::Logic(op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let lit = match op {
                LogicOp::And => reg.and(x, y),
                LogicOp::Or => reg.or(x, y),
                LogicOp::Xor => reg.xor(x, y),
            };
            Ok(Encoding::Bool(lit))
        })
    }

    pub fn bool_compare(&mut self, op: CmpOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("bool_compare({:?}, {}, {})", op, a, b);
        let x = self.bool_lit(a)?;
        let y = self.bool_lit(b)?;
        self.intern(Kind::Bool, Some(Key::Compare(Domain::Bool, op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let lit = match op {
                CmpOp::Eq => reg.eq(x, y),
                CmpOp::Gt => reg.gt(x, y),
            };
            Ok(Encoding::Bool(lit))
        })
    }
}

// Integer operators
impl Registry {
    pub fn int_compare(&mut self, op: CmpOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("int_compare({:?}, {}, {})", op, a, b);
        let x = self.int_bits(a)?;
        let y = self.int_bits(b)?;
        self.intern(Kind::Bool, Some(Key::Compare(Domain::Int, op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let lit = match op {
                CmpOp::Eq => reg.eq_bits(&x, &y),
                CmpOp::Gt => reg.gt_bits(&x, &y),
            };
            Ok(Encoding::Bool(lit))
        })
    }

    pub fn int_arith(&mut self, op: ArithOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("int_arith({:?}, {}, {})", op, a, b);
        let x = self.int_bits(a)?;
        let y = self.int_bits(b)?;
        self.intern(Kind::Int, Some(Key::Arith(op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let bits = match op {
                ArithOp::Add => reg.add_bits(&x, &y),
                ArithOp::Sub => reg.sub_bits(&x, &y),
                ArithOp::Mul => reg.mul_bits(&x, &y),
            };
            Ok(Encoding::Int(bits.into()))
        })
    }

    /// Static shift by a literal amount, filling with zeros.
    pub fn shift(&mut self, op: ShiftOp, a: NodeId, amount: u32) -> Result<NodeId> {
        debug!("shift({:?}, {}, {})", op, a, amount);
        let x = self.int_bits(a)?;
        let n = x.len();
        let k = (amount as usize).min(n);
        self.intern(Kind::Int, Some(Key::Shift(op, a, amount)), |reg| {
            reg.depend(a);
            let bits: Vec<Lit> = match op {
                ShiftOp::Left => std::iter::repeat(Lit::FALSE)
                    .take(k)
                    .chain(x[..n - k].iter().copied())
                    .collect(),
                ShiftOp::Right => x[k..]
                    .iter()
                    .copied()
                    .chain(std::iter::repeat(Lit::FALSE).take(k))
                    .collect(),
            };
            Ok(Encoding::Int(bits.into()))
        })
    }

    /// Multiplexer `pred ? cons : alt` over Bool or Int operands.
    pub fn cond(&mut self, domain: Domain, pred: NodeId, cons: NodeId, alt: NodeId) -> Result<NodeId> {
        debug!("cond({:?}, {}, {}, {})", domain, pred, cons, alt);
        let pred = self.truth(pred)?;
        let p = self.bool_lit(pred)?;
        let key = Some(Key::Cond(domain, pred, cons, alt));
        match domain {
            Domain::Bool => {
                let t = self.bool_lit(cons)?;
                let e = self.bool_lit(alt)?;
                self.intern(Kind::Bool, key, |reg| {
                    reg.depend(pred);
                    reg.depend(cons);
                    reg.depend(alt);
                    Ok(Encoding::Bool(reg.ite(p, t, e)))
                })
            }
            Domain::Int => {
                let t = self.int_bits(cons)?;
                let e = self.int_bits(alt)?;
                self.intern(Kind::Int, key, |reg| {
                    reg.depend(pred);
                    reg.depend(cons);
                    reg.depend(alt);
                    let bits: Vec<Lit> = t.iter().zip(&e).map(|(&x, &y)| reg.ite(p, x, y)).collect();
                    Ok(Encoding::Int(bits.into()))
                })
            }
            Domain::Multi => self.multi_cond(pred, cons, alt),
        }
    }
}
