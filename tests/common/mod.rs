//! Brute-force reference backend.
//!
//! Enumerates every assignment of the choice atoms and computes the induced
//! model stratum by stratum: atoms are grouped into strongly connected
//! components of the "head depends on body" graph, and each component is
//! evaluated as a least fixpoint once all components it depends on are final.
//! Negative literals must refer to lower components, which holds for every
//! program the compiler emits unless derivations are made mutually negative.

#![allow(dead_code)]

use clasp_rs::config::Config;
use clasp_rs::context::Context;
use clasp_rs::driver::{Backend, Outcome};
use clasp_rs::error::Result;
use clasp_rs::expr::Var;
use clasp_rs::lit::Lit;
use clasp_rs::model::Model;
use clasp_rs::program::Program;
use clasp_rs::rule::Rule;
use clasp_rs::types::Atom;
use clasp_rs::value::Value;

pub const MAX_CHOICES: usize = 22;

pub fn init() {
    let _ = color_eyre::install();
}

/// Context of the given width backed by [`BruteForce`].
pub fn context(bits: u32) -> Context {
    init();
    Context::with_backend(Config::default().with_bits(bits), BruteForce).expect("valid config")
}

/// Returns the first model in enumeration order.
#[derive(Debug, Default)]
pub struct BruteForce;

impl Backend for BruteForce {
    fn run(&mut self, program: &Program) -> Result<Outcome> {
        let solver = Solver::new(program);
        let first = solver.models().next();
        Ok(match first {
            Some(model) => Outcome::Satisfiable(model),
            None => Outcome::Unsatisfiable,
        })
    }
}

/// Every stable model of `program`.
pub fn all_models(program: &Program) -> Vec<Model> {
    Solver::new(program).models().collect()
}

/// Value of `var` in a model obtained from [`all_models`].
pub fn decode(ctx: &Context, model: &Model, var: Var) -> Value {
    let info = ctx.info(var).expect("known variable");
    model.decode(&info.encoding).expect("decodable value")
}

pub fn int(ctx: &Context, model: &Model, var: Var) -> i64 {
    decode(ctx, model, var).as_int().expect("integer value")
}

pub fn boolean(ctx: &Context, model: &Model, var: Var) -> bool {
    decode(ctx, model, var).as_bool().expect("boolean value")
}

struct Solver {
    num_atoms: usize,
    choices: Vec<usize>,
    /// Rules grouped by the component of their head, dependencies first.
    strata: Vec<Vec<(usize, Vec<Lit>)>>,
    integrity: Vec<Vec<Lit>>,
}

impl Solver {
    fn new(program: &Program) -> Self {
        let num_atoms = program.num_atoms() as usize;
        let mut choices = Vec::new();
        let mut defining: Vec<Vec<(usize, Vec<Lit>)>> = vec![Vec::new(); num_atoms + 1];
        let mut integrity = Vec::new();

        for rule in program.rules() {
            match rule {
                Rule::Choice { heads, body } => {
                    assert!(body.is_empty(), "choice rules with bodies are not supported");
                    choices.extend(heads.iter().map(|h| h.id() as usize));
                }
                Rule::Basic { head, body } if *head == Atom::FALSE => integrity.push(body.to_vec()),
                Rule::Basic { head, body } => {
                    let h = head.id() as usize;
                    defining[h].push((h, body.to_vec()));
                }
            }
        }
        choices.sort_unstable();
        choices.dedup();
        assert!(
            choices.len() <= MAX_CHOICES,
            "too many choice atoms for brute force: {}",
            choices.len()
        );

        let components = tarjan(num_atoms, &defining);
        let mut component_of = vec![0; num_atoms + 1];
        for (c, atoms) in components.iter().enumerate() {
            for &a in atoms {
                component_of[a] = c;
            }
        }
        let mut strata = Vec::with_capacity(components.len());
        for (c, atoms) in components.iter().enumerate() {
            let mut rules = Vec::new();
            for &a in atoms {
                for (head, body) in &defining[a] {
                    for lit in body {
                        if lit.is_negated() {
                            assert_ne!(
                                component_of[lit.atom().id() as usize],
                                c,
                                "program is not stratified"
                            );
                        }
                    }
                    rules.push((*head, body.clone()));
                }
            }
            strata.push(rules);
        }

        Self {
            num_atoms,
            choices,
            strata,
            integrity,
        }
    }

    fn models(&self) -> impl Iterator<Item = Model> + '_ {
        (0u64..1 << self.choices.len()).filter_map(move |guess| self.evaluate(guess))
    }

    fn evaluate(&self, guess: u64) -> Option<Model> {
        let mut truth = vec![false; self.num_atoms + 1];
        for (i, &atom) in self.choices.iter().enumerate() {
            truth[atom] = guess >> i & 1 == 1;
        }
        let holds = |truth: &[bool], lit: &Lit| truth[lit.atom().id() as usize] != lit.is_negated();

        for rules in &self.strata {
            loop {
                let mut changed = false;
                for (head, body) in rules {
                    if !truth[*head] && body.iter().all(|l| holds(&truth, l)) {
                        truth[*head] = true;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
        }

        if self.integrity.iter().any(|body| body.iter().all(|l| holds(&truth, l))) {
            return None;
        }
        let atoms = (2..=self.num_atoms).filter(|&a| truth[a]).map(|a| Atom::new(a as u32));
        Some(Model::from_atoms(atoms))
    }
}

/// Strongly connected components, each emitted after everything it depends on.
fn tarjan(num_atoms: usize, defining: &[Vec<(usize, Vec<Lit>)>]) -> Vec<Vec<usize>> {
    struct State<'a> {
        defining: &'a [Vec<(usize, Vec<Lit>)>],
        index: Vec<Option<usize>>,
        low: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        next: usize,
        components: Vec<Vec<usize>>,
    }

    fn visit(s: &mut State, v: usize) {
        s.index[v] = Some(s.next);
        s.low[v] = s.next;
        s.next += 1;
        s.stack.push(v);
        s.on_stack[v] = true;

        let succs: Vec<usize> = s.defining[v]
            .iter()
            .flat_map(|(_, body)| body.iter().map(|l| l.atom().id() as usize))
            .collect();
        for w in succs {
            match s.index[w] {
                None => {
                    visit(s, w);
                    s.low[v] = s.low[v].min(s.low[w]);
                }
                Some(iw) if s.on_stack[w] => s.low[v] = s.low[v].min(iw),
                Some(_) => {}
            }
        }

        if Some(s.low[v]) == s.index[v] {
            let mut component = Vec::new();
            while let Some(w) = s.stack.pop() {
                s.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            s.components.push(component);
        }
    }

    let mut s = State {
        defining,
        index: vec![None; num_atoms + 1],
        low: vec![0; num_atoms + 1],
        on_stack: vec![false; num_atoms + 1],
        stack: Vec::new(),
        next: 0,
        components: Vec::new(),
    };
    for v in 1..=num_atoms {
        if s.index[v].is_none() {
            visit(&mut s, v);
        }
    }
    s.components
}
