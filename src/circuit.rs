//! Hash-consed boolean gates.
//!
//! Every gate yields one result atom defined by basic rules over its inputs:
//!
//! ```text
//! and(a, b)    r :- a, b.
//! or(a, b)     r :- a.          r :- b.
//! xor(a, b)    r :- a, not b.   r :- b, not a.
//! eq(a, b)     r :- a, b.       r :- not a, not b.
//! ite(p, t, e) r :- p, t.       r :- not p, e.
//! ```
//!
//! Since `r` only appears in heads of these rules, its truth value is fully
//! determined by the inputs under stable-model semantics. Constant inputs are
//! folded away, and identical gates are built only once.

use log::debug;

use crate::gate::Gate;
use crate::lit::Lit;
use crate::registry::Registry;
use crate::rule::Rule;

impl Registry {
    /// Looks up a gate, or allocates its atom and emits its rules.
    fn mk_gate(&mut self, gate: Gate, bodies: &[&[Lit]]) -> Lit {
        if let Some(&(lit, owner)) = self.gates.get(&gate) {
            self.depend(owner);
            return lit;
        }

        let atom = self.new_atom();
        for body in bodies {
            self.emit(Rule::basic(atom, body));
        }
        let lit = Lit::positive(atom);
        let owner = self.current().unwrap_or(crate::types::NodeId::TRUE);
        self.gates.insert(gate, (lit, owner));
        lit
    }

    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        // Base cases:
        //   and(1,B) => B
        //   and(0,B) => 0
        //   and(A,A) => A
        //   and(A,~A) => 0
        if a == Lit::TRUE {
            return b;
        }
        if b == Lit::TRUE {
            return a;
        }
        if a == Lit::FALSE || b == Lit::FALSE || a == -b {
            return Lit::FALSE;
        }
        if a == b {
            return a;
        }
        self.mk_gate(Gate::and(a, b), &[&[a, b]])
    }

    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        if a == Lit::FALSE {
            return b;
        }
        if b == Lit::FALSE {
            return a;
        }
        if a == Lit::TRUE || b == Lit::TRUE || a == -b {
            return Lit::TRUE;
        }
        if a == b {
            return a;
        }
        self.mk_gate(Gate::or(a, b), &[&[a], &[b]])
    }

    pub fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        if a == Lit::FALSE {
            return b;
        }
        if b == Lit::FALSE {
            return a;
        }
        if a == Lit::TRUE {
            return -b;
        }
        if b == Lit::TRUE {
            return -a;
        }
        if a == b {
            return Lit::FALSE;
        }
        if a == -b {
            return Lit::TRUE;
        }
        self.mk_gate(Gate::xor(a, b), &[&[a, -b], &[b, -a]])
    }

    pub fn eq(&mut self, a: Lit, b: Lit) -> Lit {
        if a == Lit::TRUE {
            return b;
        }
        if b == Lit::TRUE {
            return a;
        }
        if a == Lit::FALSE {
            return -b;
        }
        if b == Lit::FALSE {
            return -a;
        }
        if a == b {
            return Lit::TRUE;
        }
        if a == -b {
            return Lit::FALSE;
        }
        self.mk_gate(Gate::eq(a, b), &[&[a, b], &[-a, -b]])
    }

    /// `a & !b`
    pub fn gt(&mut self, a: Lit, b: Lit) -> Lit {
        self.and(a, -b)
    }

    /// If-then-else: `p ? t : e`.
    pub fn ite(&mut self, p: Lit, t: Lit, e: Lit) -> Lit {
        // Base cases:
        //   ite(1,T,E) => T
        //   ite(0,T,E) => E
        //   ite(P,T,T) => T
        //   ite(P,1,0) => P
        //   ite(P,0,1) => ~P
        //   ite(P,T,0) => and(P,T)
        //   ite(P,0,E) => and(~P,E)
        //   ite(P,1,E) => or(P,E)
        //   ite(P,T,1) => or(~P,T)
        if p == Lit::TRUE {
            return t;
        }
        if p == Lit::FALSE {
            return e;
        }
        if t == e {
            return t;
        }
        if t == Lit::TRUE && e == Lit::FALSE {
            return p;
        }
        if t == Lit::FALSE && e == Lit::TRUE {
            return -p;
        }
        if e == Lit::FALSE {
            return self.and(p, t);
        }
        if t == Lit::FALSE {
            return self.and(-p, e);
        }
        if t == Lit::TRUE {
            return self.or(p, e);
        }
        if e == Lit::TRUE {
            return self.or(-p, t);
        }
        if p.is_negated() {
            return self.ite(-p, e, t);
        }
        self.mk_gate(Gate::ite(p, t, e), &[&[p, t], &[-p, e]])
    }

    pub fn and_many(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        let mut res = Lit::TRUE;
        for lit in lits {
            res = self.and(res, lit);
            if res == Lit::FALSE {
                break;
            }
        }
        res
    }

    pub fn or_many(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        let mut res = Lit::FALSE;
        for lit in lits {
            res = self.or(res, lit);
            if res == Lit::TRUE {
                break;
            }
        }
        res
    }

    /// Sequential counter: literal that holds iff at least `n` of `lits` hold.
    ///
    /// `count[j]` is "at least `j + 1` of the inputs seen so far"; each input
    /// extends every counter by one gate, so the circuit has `O(n * len)` gates.
    pub fn at_least(&mut self, n: usize, lits: &[Lit]) -> Lit {
        debug!("at_least(n = {}, len = {})", n, lits.len());
        if n == 0 {
            return Lit::TRUE;
        }
        if n > lits.len() {
            return Lit::FALSE;
        }

        let mut count = vec![Lit::FALSE; n];
        for &x in lits {
            for j in (0..n).rev() {
                let below = if j == 0 { Lit::TRUE } else { count[j - 1] };
                let carry = self.and(below, x);
                count[j] = self.or(count[j], carry);
            }
        }
        count[n - 1]
    }
}
