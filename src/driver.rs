//! Running the external solver.

use std::io::{self, ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::program::Program;
use crate::types::Atom;

/// Verdict of a single solver run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Satisfiable(Model),
    Unsatisfiable,
}

/// Something that computes one answer set of a ground program.
pub trait Backend {
    fn run(&mut self, program: &Program) -> Result<Outcome>;
}

/// Runs a clasp-compatible solver as a child process.
///
/// The program is written to the solver's standard input in smodels format,
/// and the first answer set is read from its standard output.
#[derive(Debug, Clone, Default)]
pub struct ClaspProcess {
    config: SolverConfig,
}

impl ClaspProcess {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Backend for ClaspProcess {
    fn run(&mut self, program: &Program) -> Result<Outcome> {
        let cfg = &self.config;
        debug!("spawning `{} {}`", cfg.command, cfg.args.join(" "));
        let start = Instant::now();

        let mut child = Command::new(&cfg.command)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: cfg.command.clone(),
                source,
            })?;

        // Output is drained while the program is still being written.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = program.to_smodels();
            thread::spawn(move || match stdin.write_all(input.as_bytes()) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    warn!("solver closed its input before reading the whole program");
                    Ok(())
                }
                res => res,
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| io::Error::new(ErrorKind::Other, "solver input writer panicked"))??;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            Some(code) if cfg.accepted_exit_codes.contains(&code) => {}
            _ => {
                return Err(Error::SolverFailed {
                    status: output.status.to_string(),
                    stderr: stderr.trim().to_string(),
                });
            }
        }

        let outcome = parse_output(&stdout, program.num_atoms())?;
        info!(
            "solver finished in {:.3}s: {}",
            start.elapsed().as_secs_f64(),
            match &outcome {
                Outcome::Satisfiable(model) => format!("SATISFIABLE ({} true atoms)", model.len()),
                Outcome::Unsatisfiable => "UNSATISFIABLE".to_string(),
            }
        );
        Ok(outcome)
    }
}

/// Parses the textual output of clasp.
///
/// The verdict is a line `SATISFIABLE` or `UNSATISFIABLE` (optionally prefixed
/// by `s `). The line after `Answer: N` lists the true atoms by name.
pub fn parse_output(stdout: &str, num_atoms: u32) -> Result<Outcome> {
    let mut model = None;
    let mut verdict = None;

    let mut lines = stdout.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if line.starts_with("Answer:") {
            let answer = lines
                .next()
                .ok_or_else(|| Error::MalformedOutput("missing model after `Answer:`".to_string()))?;
            model = Some(parse_model(answer, num_atoms)?);
            continue;
        }
        let status = line.strip_prefix("s ").unwrap_or(line);
        match status {
            "SATISFIABLE" => verdict = Some(true),
            "UNSATISFIABLE" => verdict = Some(false),
            _ => {}
        }
    }

    match (verdict, model) {
        (Some(true), Some(model)) => Ok(Outcome::Satisfiable(model)),
        (Some(true), None) => Err(Error::MalformedOutput("satisfiable without a model".to_string())),
        (Some(false), _) => Ok(Outcome::Unsatisfiable),
        (None, _) => Err(Error::MalformedOutput("no verdict in solver output".to_string())),
    }
}

fn parse_model(line: &str, num_atoms: u32) -> Result<Model> {
    let line = line.strip_prefix("v ").unwrap_or(line);
    let mut atoms = Vec::new();
    for name in line.split_whitespace() {
        match Atom::from_name(name) {
            Some(atom) if atom.id() <= num_atoms => atoms.push(atom),
            _ => return Err(Error::MalformedOutput(format!("unknown atom `{}`", name))),
        }
    }
    Ok(Model::from_atoms(atoms))
}
