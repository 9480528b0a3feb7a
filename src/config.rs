//! Configuration of a [`Context`][crate::context::Context].

use crate::error::{Error, Result};

/// Default number of bits of integer variables.
pub const DEFAULT_BITS: u32 = 16;

/// Largest supported integer width; decoded values must fit into an `i64`.
pub const MAX_BITS: u32 = 62;

/// Global settings of a network.
///
/// The bit width is fixed once the first variable has been created.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of bits of every integer variable.
    pub bits: u32,
    /// How to run the external solver.
    pub solver: SolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            solver: SolverConfig::default(),
        }
    }
}

impl Config {
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// Uses the smallest width able to represent `max_val`.
    pub fn with_max_val(mut self, max_val: u64) -> Self {
        self.bits = bits_for(max_val);
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_bits(self.bits)
    }
}

pub(crate) fn check_bits(bits: u32) -> Result<()> {
    if bits == 0 || bits > MAX_BITS {
        return Err(Error::InvalidBits(bits));
    }
    Ok(())
}

/// Number of bits needed to represent `value` (at least one).
pub fn bits_for(value: u64) -> u32 {
    (u64::BITS - value.leading_zeros()).max(1)
}

/// Command line of the external solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Exit codes that denote a completed run.
    ///
    /// clasp reports `10` for satisfiable, `20` for unsatisfiable and `30` for
    /// an exhausted search with a model.
    pub accepted_exit_codes: Vec<i32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            command: "clasp".to_string(),
            args: ["--sat-prepro", "--eq=1", "--trans-ext=dynamic"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            accepted_exit_codes: vec![0, 10, 20, 30],
        }
    }
}

impl SolverConfig {
    pub fn new(command: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(0), 1);
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(22), 5);
        assert_eq!(bits_for(85), 7);
        assert_eq!(bits_for(128), 8);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        assert!(matches!(Config::default().with_bits(0).validate(), Err(Error::InvalidBits(0))));
        assert!(matches!(Config::default().with_bits(63).validate(), Err(Error::InvalidBits(63))));
        assert_eq!(Config::default().with_max_val(100).bits, 7);
    }

    #[test]
    fn test_default_solver() {
        let solver = SolverConfig::default();
        assert_eq!(solver.command, "clasp");
        assert_eq!(solver.args.len(), 3);

        let custom = SolverConfig::new("sh", ["-c", "true"]);
        assert_eq!(custom.args, vec!["-c", "true"]);
        assert_eq!(custom.accepted_exit_codes, solver.accepted_exit_codes);
    }
}
