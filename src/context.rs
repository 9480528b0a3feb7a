//! The user-facing session object.
//!
//! A [`Context`] owns everything a constraint network needs: the registry of
//! variables and expressions, the solver backend, and the values decoded from
//! the last answer set. All methods take `&self`, so variables and
//! expressions can be built freely while other handles are alive.
//!
//! ```no_run
//! use clasp_rs::context::Context;
//!
//! # fn main() -> clasp_rs::error::Result<()> {
//! let ctx = Context::default();
//! ctx.set_max_val(100)?;
//!
//! let x = ctx.int_var();
//! let y = ctx.int_var();
//! ctx.require((x + y).equals(42))?;
//! ctx.require(x.gt(y))?;
//!
//! if ctx.solve()? {
//!     println!("x = {:?}, y = {:?}", ctx.int_value(x), ctx.int_value(y));
//! }
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::fmt::{self, Debug};

use log::{debug, info, warn};

use crate::config::{bits_for, Config};
use crate::debug::VarInfo;
use crate::driver::{Backend, ClaspProcess, Outcome};
use crate::error::Result;
use crate::expr::{cond, BinOp, Expr, Var};
use crate::node::ShiftOp;
use crate::program::Program;
use crate::registry::Registry;
use crate::types::NodeId;
use crate::value::Value;

pub struct Context {
    registry: RefCell<Registry>,
    backend: RefCell<Box<dyn Backend>>,
    /// Decoded value of every node in the last model.
    values: RefCell<Vec<Option<Value>>>,
    failed: RefCell<Vec<String>>,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = ClaspProcess::new(config.solver);
        Ok(Self::build(config.bits, Box::new(backend)))
    }

    /// Context that solves with a custom backend instead of the clasp process.
    pub fn with_backend(config: Config, backend: impl Backend + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config.bits, Box::new(backend)))
    }

    fn build(bits: u32, backend: Box<dyn Backend>) -> Self {
        Self {
            registry: RefCell::new(Registry::new(bits)),
            backend: RefCell::new(backend),
            values: RefCell::new(Vec::new()),
            failed: RefCell::new(Vec::new()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        let config = Config::default();
        Self::build(config.bits, Box::new(ClaspProcess::new(config.solver)))
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Context")
            .field("bits", &registry.bits())
            .field("nodes", &registry.len())
            .field("atoms", &registry.num_atoms())
            .finish()
    }
}

// Configuration
impl Context {
    pub fn bits(&self) -> u32 {
        self.registry.borrow().bits()
    }

    /// Sets the integer width. Fails once any variable has been created.
    pub fn set_bits(&self, bits: u32) -> Result<()> {
        self.registry.borrow_mut().set_bits(bits)
    }

    /// Sets the integer width to the smallest one that can hold `max_val`.
    pub fn set_max_val(&self, max_val: u64) -> Result<()> {
        self.set_bits(bits_for(max_val))
    }

    /// Number of variables and expressions built so far.
    pub fn len(&self) -> usize {
        self.registry.borrow().len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }
}

// Variables
impl Context {
    fn handle(&self, id: NodeId) -> Var {
        let mut registry = self.registry.borrow_mut();
        registry.observe(id);
        Var::new(id, registry.node(id).kind)
    }

    pub fn bool_var(&self) -> Var {
        let id = self.registry.borrow_mut().bool_var();
        self.handle(id)
    }

    pub fn int_var(&self) -> Var {
        let id = self.registry.borrow_mut().int_var();
        self.handle(id)
    }

    /// Integer variable restricted to `lo..=hi`.
    pub fn int_range(&self, lo: u64, hi: u64) -> Result<Var> {
        let id = self.registry.borrow_mut().int_range(lo, hi)?;
        Ok(self.handle(id))
    }

    /// Integer variable restricted to the given values.
    pub fn int_in(&self, values: &[u64]) -> Result<Var> {
        let id = self.registry.borrow_mut().int_in(values)?;
        Ok(self.handle(id))
    }

    /// Variable taking exactly one of `values`.
    pub fn multi_var<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Result<Var> {
        let values = values.into_iter().map(Into::into).collect();
        let id = self.registry.borrow_mut().multi_var(values)?;
        Ok(self.handle(id))
    }

    /// Boolean that is false unless proven by [`prove_if`][Context::prove_if].
    pub fn atom(&self) -> Var {
        let id = self.registry.borrow_mut().atom();
        self.handle(id)
    }

    /// Constant of the kind matching `value`: Bool, Int, or single-valued Multi.
    pub fn constant(&self, value: impl Into<Value>) -> Result<Var> {
        self.eval(Expr::Const(value.into()))
    }

    /// Compiles an expression and returns a handle to its result.
    pub fn eval(&self, expr: impl Into<Expr>) -> Result<Var> {
        let expr = expr.into();
        let id = self.registry.borrow_mut().eval(&expr)?;
        Ok(self.handle(id))
    }
}

// Operators
impl Context {
    pub fn not(&self, a: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::Not(Box::new(a.into())))
    }

    pub fn and(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::And, a, b))
    }

    pub fn or(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Or, a, b))
    }

    pub fn xor(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Xor, a, b))
    }

    pub fn equals(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Eq, a, b))
    }

    pub fn not_equals(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Ne, a, b))
    }

    pub fn lt(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Lt, a, b))
    }

    pub fn le(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Le, a, b))
    }

    pub fn gt(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Gt, a, b))
    }

    pub fn ge(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Ge, a, b))
    }

    pub fn add(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Add, a, b))
    }

    pub fn sub(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Sub, a, b))
    }

    pub fn mul(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Mul, a, b))
    }

    pub fn div(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Div, a, b))
    }

    pub fn index(&self, a: impl Into<Expr>, i: impl Into<Expr>) -> Result<Var> {
        self.eval(Expr::binary(BinOp::Index, a, i))
    }

    pub fn shl(&self, a: impl Into<Expr>, amount: u32) -> Result<Var> {
        self.eval(Expr::Shift(ShiftOp::Left, Box::new(a.into()), amount))
    }

    pub fn shr(&self, a: impl Into<Expr>, amount: u32) -> Result<Var> {
        self.eval(Expr::Shift(ShiftOp::Right, Box::new(a.into()), amount))
    }

    pub fn cond(&self, pred: impl Into<Expr>, cons: impl Into<Expr>, alt: impl Into<Expr>) -> Result<Var> {
        self.eval(cond(pred, cons, alt))
    }
}

// Constraints
impl Context {
    /// Adds the rule `atom :- cond.`
    pub fn prove_if(&self, atom: Var, cond: impl Into<Expr>) -> Result<()> {
        let cond = cond.into();
        let mut registry = self.registry.borrow_mut();
        let target = registry.eval(&Expr::from(atom))?;
        let cond = registry.eval(&cond)?;
        registry.prove_if(target, cond)?;
        Ok(())
    }

    /// Requires `expr` to hold in every solution.
    pub fn require(&self, expr: impl Into<Expr>) -> Result<()> {
        let expr = expr.into();
        let mut registry = self.registry.borrow_mut();
        let id = registry.eval(&expr)?;
        let id = registry.truth(id)?;
        registry.require(id)
    }

    /// Records an advisory constraint: it is not enforced, but if it is false
    /// in a solution, `label` is reported by [`failed_requirements`][Context::failed_requirements].
    pub fn required(&self, expr: impl Into<Expr>, label: impl Into<String>) -> Result<()> {
        let expr = expr.into();
        let mut registry = self.registry.borrow_mut();
        let id = registry.eval(&expr)?;
        let id = registry.truth(id)?;
        registry.advise(id, label.into())
    }

    fn ids(&self, vars: &[Var]) -> Result<Vec<NodeId>> {
        let mut registry = self.registry.borrow_mut();
        vars.iter().map(|&v| registry.eval(&Expr::from(v))).collect()
    }

    pub fn all_different(&self, vars: &[Var]) -> Result<Var> {
        let ids = self.ids(vars)?;
        let id = self.registry.borrow_mut().all_different(&ids)?;
        Ok(self.handle(id))
    }

    pub fn require_all_diff(&self, vars: &[Var]) -> Result<()> {
        let diff = self.all_different(vars)?;
        self.require(diff)
    }

    pub fn sum(&self, vars: &[Var]) -> Result<Var> {
        let ids = self.ids(vars)?;
        let id = self.registry.borrow_mut().sum(&ids)?;
        Ok(self.handle(id))
    }

    pub fn at_least(&self, n: u32, vars: &[Var]) -> Result<Var> {
        let ids = self.ids(vars)?;
        let id = self.registry.borrow_mut().card_at_least(n, &ids)?;
        Ok(self.handle(id))
    }

    pub fn at_most(&self, n: u32, vars: &[Var]) -> Result<Var> {
        let ids = self.ids(vars)?;
        let id = self.registry.borrow_mut().card_at_most(n, &ids)?;
        Ok(self.handle(id))
    }

    pub fn exactly(&self, n: u32, vars: &[Var]) -> Result<Var> {
        let ids = self.ids(vars)?;
        let id = self.registry.borrow_mut().card_exactly(n, &ids)?;
        Ok(self.handle(id))
    }

    /// Boolean that holds iff `var` equals one of `values`.
    pub fn member<E: Into<Expr>>(&self, var: impl Into<Expr>, values: impl IntoIterator<Item = E>) -> Result<Var> {
        let var = var.into();
        let values: Vec<Expr> = values.into_iter().map(Into::into).collect();
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.eval(&var)?;
            registry.member(id, &values)?
        };
        Ok(self.handle(id))
    }
}

// Solving
impl Context {
    /// The complete program for the current network.
    pub fn program(&self) -> Program {
        self.registry.borrow().assemble()
    }

    /// Compiles the whole network, runs the backend and decodes the answer.
    ///
    /// Returns `false` if the network is unsatisfiable; previously decoded
    /// values are kept in that case, failed requirement labels are not.
    pub fn solve(&self) -> Result<bool> {
        self.failed.borrow_mut().clear();
        let program = self.program();
        debug!("solve: {} rules, {} atoms", program.rules().len(), program.num_atoms());
        let outcome = self.backend.borrow_mut().run(&program)?;

        let model = match outcome {
            Outcome::Satisfiable(model) => model,
            Outcome::Unsatisfiable => {
                info!("solve: unsatisfiable");
                return Ok(false);
            }
        };

        let registry = self.registry.borrow();
        let values = registry.nodes().map(|(_, node)| model.decode(&node.encoding)).collect();
        let failed: Vec<String> = registry
            .advisories()
            .iter()
            .filter(|a| !model.lit_value(a.lit))
            .map(|a| a.label.clone())
            .collect();
        for label in &failed {
            warn!("requirement failed: {}", label);
        }
        info!("solve: satisfiable, {} of {} advisory requirements failed", failed.len(), registry.advisories().len());

        *self.values.borrow_mut() = values;
        *self.failed.borrow_mut() = failed;
        Ok(true)
    }

    /// Labels of advisory requirements that were false in the last model.
    pub fn failed_requirements(&self) -> Vec<String> {
        self.failed.borrow().clone()
    }

    /// Value of `var` in the last model, or `None` before the first satisfiable solve.
    pub fn value(&self, var: Var) -> Option<Value> {
        self.values.borrow().get(var.id().index()).cloned().flatten()
    }

    pub fn bool_value(&self, var: Var) -> Option<bool> {
        self.value(var)?.as_bool()
    }

    pub fn int_value(&self, var: Var) -> Option<i64> {
        self.value(var)?.as_int()
    }

    pub fn info(&self, var: Var) -> Result<VarInfo> {
        let registry = self.registry.borrow();
        let node = registry.check(var.id())?;
        Ok(VarInfo {
            kind: node.kind,
            encoding: node.encoding.clone(),
            value: self.value(var),
        })
    }
}
