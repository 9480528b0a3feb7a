//! Error types.

use thiserror::Error;

use crate::types::Kind;
use crate::value::Value;

/// Errors raised while building a network or running the solver.
#[derive(Error, Debug)]
pub enum Error {
    /// The bit width was changed after variables were created.
    #[error("cannot change the number of bits after variables have been created")]
    ConfigFrozen,

    /// The requested bit width is not supported.
    #[error("invalid number of bits: {0} (expected 1..=62)")]
    InvalidBits(u32),

    /// An operator was applied to operands of incompatible kinds.
    #[error("cannot apply `{op}` to {lhs} and {rhs}")]
    KindMismatch {
        op: &'static str,
        lhs: Kind,
        rhs: Kind,
    },

    /// An operation requires a specific kind of variable.
    #[error("expected {expected} variable, found {found}")]
    UnexpectedKind { expected: Kind, found: Kind },

    /// A constant does not fit into the configured integer width.
    #[error("value {value} is not representable with {bits} bits")]
    OutOfRange { value: i128, bits: u32 },

    /// An integer range with `lo > hi`.
    #[error("invalid integer range {lo}..={hi}")]
    InvalidRange { lo: u64, hi: u64 },

    /// A multi-valued variable (or value list) without values.
    #[error("variable domain is empty")]
    EmptyDomain,

    /// A multi-valued operation is undefined for some pair of possible values.
    #[error("`{op}` is undefined for {lhs} and {rhs}")]
    UndefinedOperation {
        op: &'static str,
        lhs: Value,
        rhs: Value,
    },

    /// A handle that does not belong to this context.
    #[error("unknown variable")]
    UnknownVar,

    /// The solver process could not be started.
    #[error("failed to start solver `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Communication with the solver process failed.
    #[error("solver I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The solver exited with an unexpected status.
    #[error("solver exited with {status}: {stderr}")]
    SolverFailed { status: String, stderr: String },

    /// The solver output does not follow the expected protocol.
    #[error("malformed solver output: {0}")]
    MalformedOutput(String),
}

/// Result type for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
