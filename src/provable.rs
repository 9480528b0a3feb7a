//! Atoms: booleans that only hold when derived.
//!
//! An atom has no choice rule, so under stable-model semantics it is true
//! exactly when some `prove_if` rule with a true condition supports it.
//! Cyclic support (`a :- b. b :- a.`) does not make either atom true.

use log::debug;

use crate::error::{Error, Result};
use crate::lit::Lit;
use crate::node::{Encoding, Key};
use crate::registry::Registry;
use crate::rule::Rule;
use crate::types::{Kind, NodeId};

impl Registry {
    pub fn atom(&mut self) -> NodeId {
        debug!("atom()");
        self.fresh(Kind::Atom, |reg| Encoding::Bool(Lit::positive(reg.new_atom())))
    }

    /// Adds the rule `target :- cond.` and returns the derivation node.
    pub fn prove_if(&mut self, target: NodeId, cond: NodeId) -> Result<NodeId> {
        let found = self.check(target)?.kind;
        if found != Kind::Atom {
            return Err(Error::UnexpectedKind {
                expected: Kind::Atom,
                found,
            });
        }
        let head = self.bool_lit(target)?.atom();
        let cond = self.truth(cond)?;
        let body = self.bool_lit(cond)?;
        debug!("prove_if({} :- {})", head, body);

        let id = self.intern(Kind::Bool, Some(Key::Derive(target, cond)), |reg| {
            reg.depend(target);
            reg.depend(cond);
            if body != Lit::FALSE {
                reg.emit(Rule::basic(head, &[body]));
            }
            Ok(Encoding::Bool(body))
        })?;
        self.add_derivation(id);
        Ok(id)
    }
}
