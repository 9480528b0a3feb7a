//! Arena of nodes with structural memoization.
//!
//! # Design
//!
//! The registry owns every variable and expression created in a
//! [`Context`][crate::context::Context]:
//!
//! 1. A `Vec<Node>` for node storage, indexed by [`NodeId`]. Nodes are never
//!    freed, so ids stay valid for the lifetime of the registry.
//! 2. A hash map from canonical structural [`Key`] to node id. Building an
//!    expression whose key is already present returns the existing node and
//!    reuses its rules.
//! 3. A hash map from [`Gate`] to its result literal and owning node (see the
//!    `circuit` module). Gates are shared between nodes; a node reusing a gate
//!    it did not create records a dependency on the owner.
//!
//! While a node is being built it is the *current owner*: every rule emitted
//! in the meantime is stored in its rule list. The assembler later walks the
//! dependency graph and emits each node's rules exactly once.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::idset::NodeSet;
use crate::config::check_bits;
use crate::error::{Error, Result};
use crate::gate::Gate;
use crate::lit::Lit;
use crate::node::{Encoding, Key, Node};
use crate::rule::Rule;
use crate::types::{Atom, Kind, NodeId};

/// A labelled expression checked after solving, without being enforced.
#[derive(Debug, Clone)]
pub struct Advisory {
    pub label: String,
    pub node: NodeId,
    pub lit: Lit,
}

#[derive(Debug)]
pub struct Registry {
    bits: u32,
    nodes: Vec<Node>,
    memo: HashMap<Key, NodeId>,
    pub(crate) gates: HashMap<Gate, (Lit, NodeId)>,
    last_atom: u32,
    current: Option<NodeId>,
    constraints: Vec<(NodeId, Lit)>,
    required: HashSet<Lit>,
    derivations: Vec<NodeId>,
    advisories: Vec<Advisory>,
    observed: NodeSet,
}

impl Registry {
    pub fn new(bits: u32) -> Self {
        let mut one = Node::new(Kind::Bool, None);
        one.encoding = Encoding::Bool(Lit::TRUE);
        one.rules.push(Rule::fact(Atom::TRUE));

        Self {
            bits,
            nodes: vec![one],
            memo: HashMap::new(),
            gates: HashMap::new(),
            last_atom: Atom::TRUE.id(),
            current: None,
            constraints: Vec::new(),
            required: HashSet::new(),
            derivations: Vec::new(),
            advisories: Vec::new(),
            observed: NodeSet::default(),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Changes the integer width. Only allowed while no variable exists.
    pub fn set_bits(&mut self, bits: u32) -> Result<()> {
        if self.nodes.len() > 1 {
            return Err(Error::ConfigFrozen);
        }
        check_bits(bits)?;
        debug!("set_bits(bits = {})", bits);
        self.bits = bits;
        Ok(())
    }

    /// Number of nodes, including the constant `true` node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Highest allocated atom.
    pub fn num_atoms(&self) -> u32 {
        self.last_atom
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId::new(i), node))
    }

    /// Returns the node, or [`Error::UnknownVar`] for a foreign id.
    pub fn check(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(Error::UnknownVar)
    }

    pub fn encoding(&self, id: NodeId) -> &Encoding {
        &self.node(id).encoding
    }

    pub fn constraints(&self) -> &[(NodeId, Lit)] {
        &self.constraints
    }

    pub fn derivations(&self) -> &[NodeId] {
        &self.derivations
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn is_observed(&self, id: NodeId) -> bool {
        self.observed.contains(id)
    }
}

// Atoms and rules
impl Registry {
    pub fn new_atom(&mut self) -> Atom {
        self.last_atom += 1;
        Atom::new(self.last_atom)
    }

    /// Allocates an atom that the solver may freely choose.
    pub fn choice(&mut self) -> Lit {
        let atom = self.new_atom();
        self.emit(Rule::choice(&[atom]));
        Lit::positive(atom)
    }

    /// Stores a rule in the node currently being built.
    pub fn emit(&mut self, rule: Rule) {
        let owner = self.current.unwrap_or(NodeId::TRUE);
        trace!("{}: {}", owner, rule);
        self.nodes[owner.index()].rules.push(rule);
    }

    /// Excludes every solution in which `lit` holds.
    pub fn forbid(&mut self, lit: Lit) {
        if lit == Lit::FALSE {
            return;
        }
        self.emit(Rule::integrity(&[lit]));
    }

    /// Records that the node being built relies on the rules of `id`.
    pub fn depend(&mut self, id: NodeId) {
        if let Some(current) = self.current {
            if current != id {
                self.nodes[current.index()].deps.push(id);
            }
        }
    }

    pub(crate) fn current(&self) -> Option<NodeId> {
        self.current
    }
}

// Interning
impl Registry {
    /// Returns the node with the given structural key, building it with `build` if absent.
    ///
    /// Fresh variables pass `key = None` and are never shared. If `build`
    /// fails, the key is not recorded and the error is returned.
    pub fn intern<F>(&mut self, kind: Kind, key: Option<Key>, build: F) -> Result<NodeId>
    where
        F: FnOnce(&mut Self) -> Result<Encoding>,
    {
        let key = key.map(Key::canonical);

        if let Some(key) = &key {
            if let Some(&id) = self.memo.get(key) {
                debug!("intern: reusing {} for {:?}", id, key);
                self.depend(id);
                return Ok(id);
            }
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(kind, key.clone()));

        let outer = self.current.replace(id);
        let result = build(self);
        self.current = outer;
        let encoding = result?;

        debug!("intern: {} {} {:?} -> {:?}", id, kind, key, encoding);
        self.nodes[id.index()].encoding = encoding;
        if let Some(key) = key {
            self.memo.insert(key, id);
        }
        self.depend(id);
        Ok(id)
    }

    /// Builds an unshared node whose construction cannot fail.
    pub fn fresh<F>(&mut self, kind: Kind, build: F) -> NodeId
    where
        F: FnOnce(&mut Self) -> Encoding,
    {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(kind, None));

        let outer = self.current.replace(id);
        let encoding = build(self);
        self.current = outer;

        debug!("fresh: {} {} -> {:?}", id, kind, encoding);
        self.nodes[id.index()].encoding = encoding;
        self.depend(id);
        id
    }

    /// Shared node with a fixed encoding and no rules of its own.
    pub fn constant(&mut self, kind: Kind, key: Key, encoding: Encoding) -> NodeId {
        if let Some(&id) = self.memo.get(&key) {
            self.depend(id);
            return id;
        }
        let id = self.fresh(kind, |_| encoding);
        self.nodes[id.index()].key = Some(key.clone());
        self.memo.insert(key, id);
        id
    }

    /// Marks a node as handed out to the caller, making it a root of the program.
    pub fn observe(&mut self, id: NodeId) {
        self.observed.insert(id);
    }
}

// Constraints
impl Registry {
    /// Literal of a Bool or Atom node.
    pub fn bool_lit(&self, id: NodeId) -> Result<Lit> {
        let node = self.check(id)?;
        node.lit().ok_or(Error::UnexpectedKind {
            expected: Kind::Bool,
            found: node.kind,
        })
    }

    /// Asserts that the Bool node `id` holds in every solution.
    pub fn require(&mut self, id: NodeId) -> Result<()> {
        let lit = self.bool_lit(id)?;
        debug!("require({} = {})", id, lit);
        if lit != Lit::TRUE && self.required.insert(lit) {
            self.constraints.push((id, lit));
        }
        Ok(())
    }

    pub fn advise(&mut self, id: NodeId, label: String) -> Result<()> {
        let lit = self.bool_lit(id)?;
        debug!("advise({} = {}, {:?})", id, lit, label);
        self.advisories.push(Advisory { label, node: id, lit });
        Ok(())
    }

    pub fn add_derivation(&mut self, id: NodeId) {
        if !self.derivations.contains(&id) {
            self.derivations.push(id);
        }
    }
}
