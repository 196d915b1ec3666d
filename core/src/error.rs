//! Parse error taxonomy.
//!
//! Every failure the engine can produce carries a stable symbolic
//! [`ErrorCode`], a human-readable message, the name of the command node
//! where it was detected, and the exit code the exit policy should use.
//! Help and version are terminal display outcomes, not failures; they
//! travel through the same type so override-mode callers can catch them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::option::OptionSpec;

/// Stable symbolic error kinds.
///
/// The serialized/string form (`as_str`) is part of the crate's contract
/// and does not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Token classified as option-shaped but matching no declared option.
    #[serde(rename = "cmdtree.unknownOption")]
    UnknownOption,
    /// First operand of a routing node matched no subcommand.
    #[serde(rename = "cmdtree.unknownCommand")]
    UnknownCommand,
    /// A required-arity option had no value token to consume.
    #[serde(rename = "cmdtree.optionMissingArgument")]
    OptionMissingArgument,
    /// A mandatory option was never supplied.
    #[serde(rename = "cmdtree.missingMandatoryOptionValue")]
    MissingMandatoryOptionValue,
    /// A required positional argument was never supplied.
    #[serde(rename = "cmdtree.missingArgument")]
    MissingArgument,
    /// Surplus operands with excess arguments disallowed.
    #[serde(rename = "cmdtree.excessArguments")]
    ExcessArguments,
    /// A coercer rejected a raw value.
    #[serde(rename = "cmdtree.invalidOptionArgument")]
    InvalidOptionArgument,
    /// Terminal display outcome: show help.
    #[serde(rename = "cmdtree.help")]
    Help,
    /// Terminal display outcome: show the version string.
    #[serde(rename = "cmdtree.version")]
    Version,
}

impl ErrorCode {
    /// The stable string form of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownOption => "cmdtree.unknownOption",
            ErrorCode::UnknownCommand => "cmdtree.unknownCommand",
            ErrorCode::OptionMissingArgument => "cmdtree.optionMissingArgument",
            ErrorCode::MissingMandatoryOptionValue => "cmdtree.missingMandatoryOptionValue",
            ErrorCode::MissingArgument => "cmdtree.missingArgument",
            ErrorCode::ExcessArguments => "cmdtree.excessArguments",
            ErrorCode::InvalidOptionArgument => "cmdtree.invalidOptionArgument",
            ErrorCode::Help => "cmdtree.help",
            ErrorCode::Version => "cmdtree.version",
        }
    }

    /// Whether this is a display outcome rather than a failure.
    pub const fn is_display(self) -> bool {
        matches!(self, ErrorCode::Help | ErrorCode::Version)
    }
}

/// A structured parse failure or terminal display outcome.
///
/// Errors are values: in override mode they are returned to the original
/// call site; in exit mode the exit policy writes the message and
/// terminates with `exit_code`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    /// Stable symbolic kind.
    pub code: ErrorCode,
    /// Single-line diagnostic (for display outcomes, the text to show).
    pub message: String,
    /// Exit code for the exit policy (0 for requested help/version).
    pub exit_code: i32,
    /// Name of the command node where the failure was detected.
    pub command: String,
}

impl ParseError {
    fn new(code: ErrorCode, command: &str, message: String, exit_code: i32) -> Self {
        Self {
            code,
            message,
            exit_code,
            command: command.to_string(),
        }
    }

    /// Overrides the exit code, for per-error-kind customization.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn unknown_option(command: &str, token: &str) -> Self {
        Self::new(
            ErrorCode::UnknownOption,
            command,
            format!("unknown option '{token}'"),
            1,
        )
    }

    /// Unknown option caused by an ambiguous long-flag prefix; the message
    /// names the candidates.
    pub fn ambiguous_option(command: &str, token: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::UnknownOption,
            command,
            format!(
                "ambiguous option '{token}' (could be {})",
                candidates.join(" or ")
            ),
            1,
        )
    }

    pub fn unknown_command(command: &str, operand: &str) -> Self {
        Self::new(
            ErrorCode::UnknownCommand,
            command,
            format!("unknown command '{operand}'"),
            1,
        )
    }

    pub fn option_missing_argument(command: &str, option: &OptionSpec) -> Self {
        Self::new(
            ErrorCode::OptionMissingArgument,
            command,
            format!("option '{}' argument missing", option.flags),
            1,
        )
    }

    pub fn missing_mandatory_option(command: &str, option: &OptionSpec) -> Self {
        Self::new(
            ErrorCode::MissingMandatoryOptionValue,
            command,
            format!("required option '{}' not specified", option.flags),
            1,
        )
    }

    pub fn missing_argument(command: &str, name: &str) -> Self {
        Self::new(
            ErrorCode::MissingArgument,
            command,
            format!("missing required argument '{name}'"),
            1,
        )
    }

    pub fn excess_arguments(command: &str, surplus: &[String]) -> Self {
        Self::new(
            ErrorCode::ExcessArguments,
            command,
            format!("too many arguments, unexpected {}", surplus.join(" ")),
            1,
        )
    }

    pub fn invalid_option_argument(command: &str, subject: &str, reason: &str) -> Self {
        Self::new(
            ErrorCode::InvalidOptionArgument,
            command,
            format!("invalid value for '{subject}': {reason}"),
            1,
        )
    }

    /// Help display outcome. `requested` distinguishes an explicit `--help`
    /// (exit 0) from the no-subcommand fallback (exit 1, shown on the
    /// error path).
    pub fn help_display(command: &str, text: String, requested: bool) -> Self {
        Self::new(
            ErrorCode::Help,
            command,
            text,
            if requested { 0 } else { 1 },
        )
    }

    pub fn version_display(command: &str, version: &str) -> Self {
        Self::new(ErrorCode::Version, command, version.to_string(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_string_form_is_stable() {
        assert_eq!(ErrorCode::UnknownOption.as_str(), "cmdtree.unknownOption");
        assert_eq!(ErrorCode::Help.as_str(), "cmdtree.help");
        let json = serde_json::to_string(&ErrorCode::ExcessArguments).unwrap();
        assert_eq!(json, r#""cmdtree.excessArguments""#);
    }

    #[test]
    fn test_display_outcomes_are_not_failures() {
        assert!(ErrorCode::Help.is_display());
        assert!(ErrorCode::Version.is_display());
        assert!(!ErrorCode::UnknownOption.is_display());
    }

    #[test]
    fn test_with_exit_code_overrides_default() {
        let err = ParseError::unknown_option("prog", "-m").with_exit_code(64);
        assert_eq!(err.exit_code, 64);
        assert_eq!(err.code, ErrorCode::UnknownOption);
    }
}
