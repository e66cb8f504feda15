//! ChipOS program interpreter
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`], the statement loop and the run driver
//! - [`errors`]: runtime error kinds and the reported error
//! - [`numbers`]: number formatting and parsing shared with `str:` and `num:`
//! - [`constants`]: length limits and precedence ceilings
//!
//! # Execution Model
//!
//! Programs run straight from their symbol bytes in the store; there is no
//! parse tree. Each line is one statement, evaluated by a single pass of
//! precedence climbing. Blocks are tracked with branch records in the current
//! scope, and loops jump back by address.
//!
//! # Errors
//!
//! A failing operation records a [`RuntimeError`] in the pending-error slot
//! and unwinds to the driver, which prints the message and the offending
//! source line.

mod builtins;
mod calls;
pub mod constants;
mod control;
pub mod engine;
pub mod errors;
mod expressions;
pub mod numbers;
mod ops;

pub use engine::{Interpreter, Outcome};
pub use errors::{ErrorKind, RuntimeError};
