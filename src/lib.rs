//! # clasp-rs: constraint networks for answer set solvers
//!
//! **`clasp-rs`** compiles networks of symbolic variables and constraints into a ground logic program,
//! hands it to an external answer set solver (`clasp` by default), and decodes the answer set back into values.
//!
//! ## Variables
//!
//! - **Bool**: a free boolean, one atom.
//! - **Int**: an unsigned integer of a fixed bit width (16 by default), one atom per bit.
//!   Arithmetic never wraps around: assignments that would overflow are excluded from the solutions.
//! - **Multi**: a variable over an arbitrary finite domain of [`Value`]s, one atom per value.
//! - **Atom**: a boolean that is false unless proven, see [`Context::prove_if`].
//!
//! ## Key Features
//!
//! - **Context-Centric Architecture**: All variables live in a [`Context`]. Handles ([`Var`]) are lightweight `Copy` ids.
//! - **Structural Sharing**: Identical expressions (and identical gates inside them) compile to the same atoms and rules.
//! - **Operator Overloading**: `&`, `|`, `^`, `!`, `+`, `-`, `*`, `/`, `<<`, `>>` build lazy [`Expr`] trees.
//! - **Pluggable Backend**: The solver is behind the [`Backend`][crate::driver::Backend] trait.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use clasp_rs::context::Context;
//!
//! # fn main() -> clasp_rs::error::Result<()> {
//! let ctx = Context::default();
//! ctx.set_max_val(100)?;
//!
//! let x = ctx.int_var();
//! let y = ctx.int_range(3, 9)?;
//! let color = ctx.multi_var(["red", "green", "blue"])?;
//!
//! ctx.require((x * y).equals(42))?;
//! ctx.require(x.gt(y) | color.equals("red"))?;
//!
//! if ctx.solve()? {
//!     println!("x = {:?}", ctx.int_value(x));
//!     println!("y = {:?}", ctx.int_value(y));
//!     println!("color = {:?}", ctx.value(color));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Components
//!
//! - **[`context`]**: The [`Context`] session object and its construction API.
//! - **[`registry`]**: Node storage and memoization. Start here for the encoding details.
//! - **[`program`]**: Assembly of the program and the smodels format.
//! - **[`driver`]**: The solver process protocol.

pub mod aggregate;
pub mod arith;
pub mod circuit;
pub mod config;
pub mod context;
pub mod debug;
pub mod driver;
pub mod error;
pub mod eval;
pub mod expr;
pub mod gate;
pub mod idset;
pub mod lit;
pub mod model;
pub mod multi;
pub mod node;
pub mod program;
pub mod provable;
pub mod registry;
pub mod rule;
pub mod types;
pub mod value;

pub use crate::context::Context;
pub use crate::expr::{cond, Expr, Var};
pub use crate::value::Value;
