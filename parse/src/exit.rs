//! Exit-mode error policy.
//!
//! Override mode is simply [`try_parse`](crate::try_parse) returning the
//! error to the original call site. Exit mode, the default behavior of
//! [`parse`](crate::parse), writes a diagnostic and terminates the
//! process. The formatting half is exposed separately so tests and host
//! applications can substitute an in-memory sink.

use std::io::{self, Write};
use std::process;

use cmdtree_core::{Command, ParseError};

/// Writes the diagnostic for a parse outcome to the given sink.
///
/// Display outcomes (help, version) emit their text verbatim; failures
/// emit a single-line `error:` diagnostic followed by the usage line of
/// the command node where the failure was detected.
pub fn write_diagnostic(
    error: &ParseError,
    root: &Command,
    out: &mut dyn Write,
) -> io::Result<()> {
    if error.code.is_display() {
        return writeln!(out, "{}", error.message);
    }
    writeln!(out, "error: {}", error.message)?;
    writeln!(out, "{}", failing_node(root, &error.command).usage())
}

/// Writes the diagnostic to stdout (exit code 0) or stderr, then
/// terminates the process with the error's exit code.
pub fn exit_with(error: &ParseError, root: &Command) -> ! {
    if error.exit_code == 0 {
        let _ = write_diagnostic(error, root, &mut io::stdout());
    } else {
        let _ = write_diagnostic(error, root, &mut io::stderr());
    }
    process::exit(error.exit_code)
}

/// Finds the node a failure was tagged with, falling back to the root.
fn failing_node<'c>(root: &'c Command, name: &str) -> &'c Command {
    fn walk<'c>(node: &'c Command, name: &str) -> Option<&'c Command> {
        if node.name == name {
            return Some(node);
        }
        node.subcommands.iter().find_map(|child| walk(child, name))
    }
    walk(root, name).unwrap_or(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_diagnostic_includes_usage() {
        let cmd = Command::new("chunker").argument("<input>", "");
        let err = ParseError::missing_argument("chunker", "input");
        let mut sink = Vec::new();
        write_diagnostic(&err, &cmd, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("error: missing required argument 'input'"));
        assert!(text.contains("Usage: chunker [options] <input>"));
    }

    #[test]
    fn test_display_outcome_is_verbatim() {
        let cmd = Command::new("chunker");
        let err = ParseError::version_display("chunker", "0.1.0");
        let mut sink = Vec::new();
        write_diagnostic(&err, &cmd, &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "0.1.0\n");
    }

    #[test]
    fn test_subcommand_failure_uses_child_usage() {
        let cmd = Command::new("chunker")
            .subcommand(Command::new("split").argument("<input>", ""));
        let err = ParseError::missing_argument("split", "input");
        let mut sink = Vec::new();
        write_diagnostic(&err, &cmd, &mut sink).unwrap();
        assert!(
            String::from_utf8(sink)
                .unwrap()
                .contains("Usage: split [options] <input>")
        );
    }
}
