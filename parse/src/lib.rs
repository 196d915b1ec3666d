//! Argv classification and binding engine for cmdtree command trees.
//!
//! Given a [`Command`] tree declared with `cmdtree-core`, this crate walks
//! a raw token sequence, separates options from operands, resolves
//! subcommand routing, applies the unknown-token policy, and binds the
//! result into a typed [`Invocation`] — or a structured
//! [`ParseError`](cmdtree_core::ParseError).
//!
//! # Main entry points
//!
//! - [`try_parse`] — override mode: errors (and the help/version display
//!   outcomes) are returned as catchable values.
//! - [`parse`] — exit mode: writes a diagnostic and terminates the
//!   process on any non-success outcome.
//! - [`parse_options`] — the raw operand/unknown partition of one node's
//!   slice, without binding or subcommand routing.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Command, Value};
//! use cmdtree_parse::try_parse;
//!
//! let program = Command::new("chunker")
//!     .option("-v, --verbose", "enable verbose output")
//!     .subcommand(
//!         Command::new("split")
//!             .option("-n, --parts <count>", "number of chunks")
//!             .argument("<input>", "file to split")
//!             .action(|_| Ok(())),
//!     );
//!
//! let inv = try_parse(&program, ["-v", "split", "--parts", "3", "data.bin"]).unwrap();
//! assert_eq!(inv.path, vec!["chunker", "split"]);
//! assert_eq!(inv.globals["verbose"], Value::Bool(true));
//! assert_eq!(inv.option_values["parts"], Value::Str("3".to_string()));
//! assert_eq!(inv.arg(0), Some(&Value::Str("data.bin".to_string())));
//! ```
//!
//! Parsing is synchronous and single-threaded; the tree is read-only
//! during a parse, and repeated parses of the same tree share no state.

mod bind;
mod engine;
pub mod exit;
mod token;

use std::collections::BTreeMap;

use cmdtree_core::{Command, Invocation, ParseError};

pub use engine::ParseResult;
pub use exit::{exit_with, write_diagnostic};

/// Parses a token sequence in override mode.
///
/// Every failure — and the help/version display outcomes — comes back as
/// a [`ParseError`] carrying a stable code, a message, and an exit code,
/// surfacing at this call site even when a deeply nested subcommand
/// failed.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Command;
/// use cmdtree_parse::try_parse;
///
/// let program = Command::new("prog").option("-p, --pepper", "add pepper");
/// let err = try_parse(&program, ["-m"]).unwrap_err();
/// assert_eq!(err.code.as_str(), "cmdtree.unknownOption");
/// ```
pub fn try_parse<I, S>(command: &Command, args: I) -> Result<Invocation, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    #[cfg(debug_assertions)]
    {
        let errors = cmdtree_core::validate_command(command);
        debug_assert!(errors.is_empty(), "invalid command definition: {errors:?}");
    }
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    engine::parse_node(
        command,
        tokens,
        vec![command.name.clone()],
        BTreeMap::new(),
    )
}

/// Parses a token sequence in exit mode (the default policy).
///
/// On success the bound [`Invocation`] is returned; on any other outcome
/// a diagnostic is written (stdout for help/version, stderr for
/// failures) and the process terminates with the outcome's exit code.
pub fn parse<I, S>(command: &Command, args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match try_parse(command, args) {
        Ok(invocation) => invocation,
        Err(error) => exit::exit_with(&error, command),
    }
}

/// Classifies one node's token slice without binding or routing.
///
/// Exposes the raw operand/unknown partition the engine works from. The
/// slice is scanned against this node's option model only; subcommand
/// names stay in `operands`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Command;
/// use cmdtree_parse::parse_options;
///
/// let program = Command::new("prog").allow_unknown_options();
/// let result = parse_options(&program, ["-m"]).unwrap();
/// assert_eq!(result.operands, vec!["-m"]);
/// assert!(result.unknown.is_empty());
/// ```
pub fn parse_options<I, S>(command: &Command, args: I) -> Result<ParseResult, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    let scan = engine::scan_node(command, tokens, false)?;
    Ok(ParseResult {
        operands: scan.operands,
        unknown: scan.unknown,
    })
}
