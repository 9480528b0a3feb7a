//! Encoders over lists of operands.

use std::collections::BTreeMap;

use log::debug;

use crate::error::Result;
use crate::expr::{BinOp, Expr, Var};
use crate::lit::Lit;
use crate::node::{Encoding, Key, LogicOp};
use crate::registry::Registry;
use crate::types::{Kind, NodeId};
use crate::value::Value;

impl Registry {
    /// Bool node that holds iff all operands take distinct values.
    ///
    /// Multi operands are encoded per value ("at most one operand takes `v`"),
    /// anything else pairwise with `!=`.
    pub fn all_different(&mut self, ids: &[NodeId]) -> Result<NodeId> {
        debug!("all_different(len = {})", ids.len());
        if ids.len() < 2 {
            return Ok(NodeId::TRUE);
        }
        let mut all_multi = true;
        for &id in ids {
            all_multi &= self.check(id)?.kind == Kind::Multi;
        }
        let key = Some(Key::AllDiff(ids.into()));

        if all_multi {
            let mut by_value: BTreeMap<Value, Vec<Lit>> = BTreeMap::new();
            for &id in ids {
                for (value, lit) in self.multi_values(id)? {
                    by_value.entry(value).or_default().push(lit);
                }
            }
            self.intern(Kind::Bool, key, |reg| {
                for &id in ids {
                    reg.depend(id);
                }
                let mut res = Lit::TRUE;
                for lits in by_value.values() {
                    let clash = reg.at_least(2, lits);
                    res = reg.and(res, -clash);
                }
                Ok(Encoding::Bool(res))
            })
        } else {
            self.intern(Kind::Bool, key, |reg| {
                let mut res = NodeId::TRUE;
                for (i, &a) in ids.iter().enumerate() {
                    for &b in &ids[i + 1..] {
                        let ne = reg.binary(BinOp::Ne, a, b)?;
                        res = reg.logic(LogicOp::And, res, ne)?;
                    }
                }
                Ok(reg.encoding(res).clone())
            })
        }
    }

    /// Sum of the operands as a balanced tree of additions.
    pub fn sum(&mut self, ids: &[NodeId]) -> Result<NodeId> {
        debug!("sum(len = {})", ids.len());
        match ids {
            [] => self.int_const(0),
            [single] => Ok(*single),
            _ => {
                let (lhs, rhs) = ids.split_at(ids.len() / 2);
                let lhs = self.sum(lhs)?;
                let rhs = self.sum(rhs)?;
                self.binary(BinOp::Add, lhs, rhs)
            }
        }
    }

    /// Bool node that holds iff at least `n` of the operands hold.
    pub fn card_at_least(&mut self, n: u32, ids: &[NodeId]) -> Result<NodeId> {
        debug!("card_at_least(n = {}, len = {})", n, ids.len());
        let mut operands = Vec::with_capacity(ids.len());
        let mut lits = Vec::with_capacity(ids.len());
        for &id in ids {
            let id = self.truth(id)?;
            lits.push(self.bool_lit(id)?);
            operands.push(id);
        }
        self.intern(Kind::Bool, Some(Key::AtLeast(n, operands.clone().into())), |reg| {
            for id in operands {
                reg.depend(id);
            }
            Ok(Encoding::Bool(reg.at_least(n as usize, &lits)))
        })
    }

    pub fn card_at_most(&mut self, n: u32, ids: &[NodeId]) -> Result<NodeId> {
        match n.checked_add(1) {
            Some(more) => {
                let more = self.card_at_least(more, ids)?;
                self.not(more)
            }
            None => {
                for &id in ids {
                    self.truth(id)?;
                }
                Ok(NodeId::TRUE)
            }
        }
    }

    pub fn card_exactly(&mut self, n: u32, ids: &[NodeId]) -> Result<NodeId> {
        let lower = self.card_at_least(n, ids)?;
        let upper = self.card_at_most(n, ids)?;
        self.logic(LogicOp::And, lower, upper)
    }

    /// Bool node that holds iff `id` equals one of `list`.
    ///
    /// Each equality is a separate node, so repeated checks share their rules.
    pub fn member(&mut self, id: NodeId, list: &[Expr]) -> Result<NodeId> {
        debug!("member({}, len = {})", id, list.len());
        let var = Var::new(id, self.check(id)?.kind);
        let mut res = self.bool_const(false);
        for item in list {
            let eq = self.eval(&var.equals(item.clone()))?;
            res = self.logic(LogicOp::Or, res, eq)?;
        }
        Ok(res)
    }
}
