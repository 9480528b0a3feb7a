//! One-hot encoding of variables over arbitrary finite domains.
//!
//! A Multi node carries one literal per possible value, sorted by value.
//! Exactly one of them holds in every solution of a fresh variable; derived
//! Multi nodes inherit that property from their operands.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Error, Result};
use crate::lit::Lit;
use crate::node::{CmpOp, Domain, Encoding, Key};
use crate::registry::Registry;
use crate::types::{Kind, NodeId};
use crate::value::{greater_than, Value, ValueOp};

impl Registry {
    /// Value literals of a Multi node.
    pub fn multi_values(&self, id: NodeId) -> Result<Vec<(Value, Lit)>> {
        let node = self.check(id)?;
        match &node.encoding {
            Encoding::Multi(values) => Ok(values.to_vec()),
            _ => Err(Error::UnexpectedKind {
                expected: Kind::Multi,
                found: node.kind,
            }),
        }
    }

    pub fn multi_var(&mut self, values: Vec<Value>) -> Result<NodeId> {
        let domain: BTreeSet<Value> = values.into_iter().collect();
        debug!("multi_var(values = {:?})", domain);

        let mut domain = domain.into_iter();
        let (first, second) = match (domain.next(), domain.next()) {
            (None, _) => return Err(Error::EmptyDomain),
            (Some(only), None) => return Ok(self.multi_const(only)),
            (Some(first), Some(second)) => (first, second),
        };

        Ok(self.fresh(Kind::Multi, |reg| {
            let values: Vec<(Value, Lit)> = [first, second]
                .into_iter()
                .chain(domain)
                .map(|v| (v, reg.choice()))
                .collect();
            let lits: Vec<Lit> = values.iter().map(|(_, lit)| *lit).collect();
            let some = reg.at_least(1, &lits);
            reg.forbid(-some);
            let many = reg.at_least(2, &lits);
            reg.forbid(many);
            Encoding::Multi(values.into())
        }))
    }

    pub fn multi_const(&mut self, value: Value) -> NodeId {
        let encoding = Encoding::Multi(vec![(value.clone(), Lit::TRUE)].into());
        self.constant(Kind::Multi, Key::Value(value), encoding)
    }

    /// `a == b` or `a > b` over the cross product of both domains.
    ///
    /// Only the smaller of the satisfying and the falsifying pair sets is
    /// encoded; in the latter case the result literal is negated.
    pub fn multi_compare(&mut self, op: CmpOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("multi_compare({:?}, {}, {})", op, a, b);
        let xs = self.multi_values(a)?;
        let ys = self.multi_values(b)?;

        let mut holds = Vec::new();
        let mut fails = Vec::new();
        for (x, lx) in &xs {
            for (y, ly) in &ys {
                let res = match op {
                    CmpOp::Eq => x == y,
                    CmpOp::Gt => greater_than(x, y).ok_or_else(|| Error::UndefinedOperation {
                        op: ">",
                        lhs: x.clone(),
                        rhs: y.clone(),
                    })?,
                };
                if res {
                    holds.push((*lx, *ly));
                } else {
                    fails.push((*lx, *ly));
                }
            }
        }

        self.intern(Kind::Bool, Some(Key::Compare(Domain::Multi, op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let (pairs, invert) = if fails.len() < holds.len() {
                (fails, true)
            } else {
                (holds, false)
            };
            let terms: Vec<Lit> = pairs.into_iter().map(|(x, y)| reg.and(x, y)).collect();
            let lit = reg.or_many(terms);
            Ok(Encoding::Bool(if invert { -lit } else { lit }))
        })
    }

    /// Applies a value operator to every pair, grouping pairs by result.
    pub fn multi_lift(&mut self, op: ValueOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("multi_lift({}, {}, {})", op.symbol(), a, b);
        let xs = self.multi_values(a)?;
        let ys = self.multi_values(b)?;

        let mut results: BTreeMap<Value, Vec<(Lit, Lit)>> = BTreeMap::new();
        for (x, lx) in &xs {
            for (y, ly) in &ys {
                let value = op.apply(x, y).ok_or_else(|| Error::UndefinedOperation {
                    op: op.symbol(),
                    lhs: x.clone(),
                    rhs: y.clone(),
                })?;
                results.entry(value).or_default().push((*lx, *ly));
            }
        }

        self.intern(Kind::Multi, Some(Key::Lift(op, a, b)), |reg| {
            reg.depend(a);
            reg.depend(b);
            let mut values = Vec::with_capacity(results.len());
            for (value, pairs) in results {
                let terms: Vec<Lit> = pairs.into_iter().map(|(x, y)| reg.and(x, y)).collect();
                values.push((value, reg.or_many(terms)));
            }
            Ok(Encoding::Multi(values.into()))
        })
    }

    /// `pred ? cons : alt` where both branches are Multi; `pred` is a Bool node.
    pub fn multi_cond(&mut self, pred: NodeId, cons: NodeId, alt: NodeId) -> Result<NodeId> {
        let p = self.bool_lit(pred)?;
        let xs: BTreeMap<Value, Lit> = self.multi_values(cons)?.into_iter().collect();
        let ys: BTreeMap<Value, Lit> = self.multi_values(alt)?.into_iter().collect();
        let domain: BTreeSet<Value> = xs.keys().chain(ys.keys()).cloned().collect();

        self.intern(Kind::Multi, Some(Key::Cond(Domain::Multi, pred, cons, alt)), |reg| {
            reg.depend(pred);
            reg.depend(cons);
            reg.depend(alt);
            let values: Vec<(Value, Lit)> = domain
                .into_iter()
                .map(|v| {
                    let t = xs.get(&v).copied().unwrap_or(Lit::FALSE);
                    let e = ys.get(&v).copied().unwrap_or(Lit::FALSE);
                    let lit = reg.ite(p, t, e);
                    (v, lit)
                })
                .collect();
            Ok(Encoding::Multi(values.into()))
        })
    }
}
