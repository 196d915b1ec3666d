//! Core command-tree model and shared result primitives.
//!
//! This crate defines the declarative side of cmdtree:
//!
//! - [`Command`] — a node in the command tree: options, positional
//!   arguments, child commands, policy flags, and an optional action
//!   handler.
//! - [`OptionSpec`] — a flag declared from a spelling string
//!   (`"-p, --pepper [level]"`), with arity, negation, defaults, and
//!   coercion.
//! - [`ArgSpec`] — a positional slot declared from a name grammar
//!   (`"<file>"`, `"[dirs...]"`).
//! - [`Value`] / [`Coercer`] — typed bound values and raw-to-typed
//!   coercion.
//! - [`Invocation`] — the structured result of a parse; produced by the
//!   `cmdtree-parse` engine but defined here so action handlers can name
//!   it.
//! - [`ParseError`] / [`ErrorCode`] — the stable parse-failure taxonomy.
//!
//! Validation ([`validate_command`]) catches structural errors in a tree
//! declaration such as duplicate flags, duplicate subcommands, and
//! misordered positional arguments.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let program = Command::new("chunker")
//!     .version("0.1.0")
//!     .option("-v, --verbose", "enable verbose output")
//!     .subcommand(
//!         Command::new("split")
//!             .option("-n, --parts <count>", "number of chunks")
//!             .argument("<input>", "file to split")
//!             .argument("[outputs...]", "chunk destinations"),
//!     );
//!
//! assert!(program.find_subcommand("split").is_some());
//! assert!(validate_command(&program).is_empty());
//! ```

mod argument;
mod command;
mod error;
mod option;
mod validate;
mod value;

pub use argument::ArgSpec;
pub use command::{Action, Command, HelpFormatter, Invocation};
pub use error::{ErrorCode, ParseError};
pub use option::{OptionSpec, ValueArity};
pub use validate::{ValidationError, validate_command};
pub use value::{Coercer, Value, coerce};
