//! Definition-time command-tree validation.
//!
//! Validates structural invariants of a command tree before any parse
//! runs: flag formats, duplicate flags and subcommands, and positional
//! argument ordering. These are programmer errors in the tree declaration,
//! not runtime parse failures, so they are reported separately from
//! [`ParseError`](crate::ParseError).
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Command, validate_command};
//!
//! let good = Command::new("prog").option("-v, --verbose", "");
//! assert!(validate_command(&good).is_empty());
//!
//! // Duplicate flag in the same scope
//! let bad = Command::new("prog")
//!     .option("-v, --verbose", "")
//!     .option("-v, --verify", "");
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::argument::ArgSpec;
use crate::command::Command;
use crate::option::OptionSpec;

/// Command-tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option has neither a short nor a long form.
    #[error("option must define a short or long flag: '{0}'")]
    MissingOptionFlag(String),
    /// Short flag does not have the form `-x`.
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag does not start with `--` or is too short.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// Two options in the same scope share a spelling.
    #[error("duplicate flag in scope: {0}")]
    DuplicateFlag(String),
    /// A variadic option has no value slot to accumulate into.
    #[error("variadic option must declare a value: '{0}'")]
    VariadicOptionWithoutValue(String),
    /// Two subcommands in the same scope share a name or alias.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A variadic argument is followed by further arguments.
    #[error("variadic argument must be declared last: {0}")]
    VariadicNotLast(String),
    /// A required argument follows an optional one.
    #[error("required argument after optional argument: {0}")]
    RequiredAfterOptional(String),
}

/// Validates a command tree, returning the errors found up to the first
/// failing scope.
pub fn validate_command(command: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(&command.options));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_arguments(&command.arguments));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for child in &command.subcommands {
        for name in
            std::iter::once(child.name.as_str()).chain(child.aliases.iter().map(String::as_str))
        {
            if !seen.insert(name) {
                errors.push(ValidationError::DuplicateSubcommand(name.to_string()));
                return errors;
            }
        }

        errors.extend(validate_command(child));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[OptionSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        if option.short.is_none() && option.long.is_none() {
            errors.push(ValidationError::MissingOptionFlag(option.flags.clone()));
            return errors;
        }

        if option.variadic && !option.takes_value() {
            errors.push(ValidationError::VariadicOptionWithoutValue(
                option.flags.clone(),
            ));
            return errors;
        }

        if let Some(short) = &option.short {
            if !short.starts_with('-') || short.starts_with("--") || short.len() != 2 {
                errors.push(ValidationError::InvalidShortFlag(short.clone()));
                return errors;
            }
            if !seen.insert(short.clone()) {
                errors.push(ValidationError::DuplicateFlag(short.clone()));
                return errors;
            }
        }

        if let Some(long) = &option.long {
            if !long.starts_with("--") || long.len() < 3 {
                errors.push(ValidationError::InvalidLongFlag(long.clone()));
                return errors;
            }
            if !seen.insert(long.clone()) {
                errors.push(ValidationError::DuplicateFlag(long.clone()));
                return errors;
            }
        }
    }

    errors
}

fn validate_arguments(arguments: &[ArgSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut optional_seen = false;

    for (index, argument) in arguments.iter().enumerate() {
        if argument.variadic && index + 1 != arguments.len() {
            errors.push(ValidationError::VariadicNotLast(argument.name.clone()));
            return errors;
        }

        if argument.required && optional_seen {
            errors.push(ValidationError::RequiredAfterOptional(argument.name.clone()));
            return errors;
        }

        if !argument.required || argument.variadic {
            optional_seen = true;
        }
    }

    errors
}
