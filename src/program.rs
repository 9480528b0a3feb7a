//! Assembly of the ground program handed to the solver.

use std::fmt::{self, Display, Write};

use log::{debug, info};

use crate::idset::NodeSet;
use crate::registry::Registry;
use crate::rule::Rule;
use crate::types::NodeId;

/// A complete ground program: rules over atoms `1..=num_atoms`.
#[derive(Debug, Clone)]
pub struct Program {
    rules: Vec<Rule>,
    num_atoms: u32,
}

impl Program {
    pub fn new(rules: Vec<Rule>, num_atoms: u32) -> Self {
        Self { rules, num_atoms }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn num_atoms(&self) -> u32 {
        self.num_atoms
    }

    /// Writes the program in the smodels internal format.
    ///
    /// Rules are followed by the symbol table (`i vi` for every atom from 2),
    /// the compute statement (`B+` empty, `B-` containing atom 1) and the
    /// number of requested models (`1`).
    pub fn write_smodels(&self, w: &mut impl Write) -> fmt::Result {
        for rule in &self.rules {
            rule.write_smodels(w)?;
            writeln!(w)?;
        }
        writeln!(w, "0")?;
        for i in 2..=self.num_atoms {
            writeln!(w, "{} v{}", i, i)?;
        }
        writeln!(w, "0")?;
        writeln!(w, "B+")?;
        writeln!(w, "0")?;
        writeln!(w, "B-")?;
        writeln!(w, "1")?;
        writeln!(w, "0")?;
        writeln!(w, "1")
    }

    pub fn to_smodels(&self) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_smodels(&mut s);
        s
    }

    /// Human-readable rendering, one rule per line.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl Registry {
    /// Roots of the program: the `true` node, required and derived nodes,
    /// advisory nodes and every node handed out to the caller.
    fn roots(&self) -> Vec<NodeId> {
        let mut roots = vec![NodeId::TRUE];
        roots.extend(self.constraints().iter().map(|&(id, _)| id));
        roots.extend(self.derivations().iter().copied());
        roots.extend(self.advisories().iter().map(|a| a.node));
        roots.extend(self.nodes().map(|(id, _)| id).filter(|&id| self.is_observed(id)));
        roots
    }

    /// Collects the rules of every node reachable from the roots, dependencies
    /// first, each node exactly once, followed by the mandatory constraints.
    pub fn assemble(&self) -> Program {
        let mut emitted = NodeSet::with_bound(self.len());
        let mut rules = Vec::new();

        for root in self.roots() {
            if emitted.contains(root) {
                continue;
            }
            // Iterative post-order: (node, whether its deps were pushed).
            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    if emitted.insert(id) {
                        rules.extend(self.node(id).rules.iter().cloned());
                    }
                    continue;
                }
                if emitted.contains(id) {
                    continue;
                }
                stack.push((id, true));
                for &dep in self.node(id).deps.iter().rev() {
                    if !emitted.contains(dep) {
                        stack.push((dep, false));
                    }
                }
            }
        }

        for &(_, lit) in self.constraints() {
            rules.push(Rule::integrity(&[-lit]));
        }

        debug!("assemble: {} of {} nodes emitted", emitted.len(), self.len());
        info!("program: {} rules over {} atoms", rules.len(), self.num_atoms());
        Program::new(rules, self.num_atoms())
    }
}
