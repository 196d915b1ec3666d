//! The argv scanning state machine.
//!
//! One left-to-right pass over a command node's token slice, producing the
//! node's operands, recorded unknown tokens, and coerced option values,
//! then either delegating to a matched subcommand with the unconsumed
//! remainder or handing the node to the binder.
//!
//! Unknown-option policy is evaluated before operand/subcommand routing:
//! an unrecognized flag never routes as an operand unless the node allows
//! unknown options, and even then it never consumes a following value.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use cmdtree_core::{Command, Invocation, OptionSpec, ParseError, Value, ValueArity};

use crate::bind;
use crate::token::{Classified, classify, looks_like_option};

/// Raw classification result for one command node: the operand/unknown
/// partition of its token slice, before any binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Tokens destined for positional binding or manual use.
    pub operands: Vec<String>,
    /// Unrecognized option-shaped tokens kept under the
    /// allow-unknown-options policy.
    pub unknown: Vec<String>,
}

/// Everything one scan pass produces for a single node.
#[derive(Debug)]
pub(crate) struct ScanOutcome<'c> {
    pub(crate) operands: Vec<String>,
    pub(crate) unknown: Vec<String>,
    pub(crate) values: BTreeMap<String, Value>,
    /// Matched child and the remaining unconsumed slice.
    pub(crate) delegate: Option<(&'c Command, Vec<String>)>,
    /// Operands that are allowed unknown options in disguise; exempt from
    /// the excess-arguments check.
    pub(crate) unknown_operands: usize,
}

/// Scans one node's token slice. `route` enables subcommand delegation;
/// [`parse_options`](crate::parse_options) disables it to expose the raw
/// partition of the full slice.
pub(crate) fn scan_node<'c>(
    command: &'c Command,
    tokens: Vec<String>,
    route: bool,
) -> Result<ScanOutcome<'c>, ParseError> {
    let mut queue: VecDeque<String> = tokens.into();
    let mut outcome = ScanOutcome {
        operands: Vec::new(),
        unknown: Vec::new(),
        values: BTreeMap::new(),
        delegate: None,
        unknown_operands: 0,
    };

    while let Some(token) = queue.pop_front() {
        match classify(command, &token) {
            Classified::Terminator => {
                outcome.operands.extend(queue.drain(..));
                break;
            }
            Classified::Matched { spec, attached } => {
                let raw = consume_value(command, spec, attached, &mut queue)?;
                debug!(option = %spec.flags, value = raw.as_deref(), "matched option");
                apply_option(command, spec, raw.as_deref(), &mut outcome.values)?;
                if spec.variadic {
                    while queue.front().is_some_and(|next| !looks_like_option(next)) {
                        if let Some(item) = queue.pop_front() {
                            apply_option(command, spec, Some(&item), &mut outcome.values)?;
                        }
                    }
                }
            }
            Classified::ClusterExpand { spec, rest } => {
                apply_option(command, spec, None, &mut outcome.values)?;
                queue.push_front(rest);
            }
            Classified::Unknown { ambiguous } => {
                // Built-in help/version spellings resolve before the
                // unknown-option policy, unless shadowed by a declared
                // option (then they never classify as unknown).
                if command.help_flag && (token == "-h" || token == "--help") {
                    return Err(ParseError::help_display(
                        &command.name,
                        command.help_text(),
                        true,
                    ));
                }
                if let Some(version) = &command.version {
                    if token == "-V" || token == "--version" {
                        return Err(ParseError::version_display(&command.name, version));
                    }
                }
                if !command.allow_unknown_options {
                    return Err(if ambiguous.is_empty() {
                        ParseError::unknown_option(&command.name, &token)
                    } else {
                        ParseError::ambiguous_option(&command.name, &token, &ambiguous)
                    });
                }
                debug!(token = %token, "recording allowed unknown option");
                if command.subcommands.is_empty() {
                    outcome.operands.push(token);
                    outcome.unknown_operands += 1;
                } else {
                    outcome.unknown.push(token);
                }
            }
            Classified::Operand => {
                if route && outcome.operands.is_empty() && !command.pass_through_args {
                    if let Some(child) = command.find_subcommand(&token) {
                        debug!(child = %child.name, "delegating to subcommand");
                        outcome.delegate = Some((child, queue.drain(..).collect()));
                        break;
                    }
                }
                outcome.operands.push(token);
                if command.pass_through_args {
                    outcome.operands.extend(queue.drain(..));
                    break;
                }
            }
        }
    }

    Ok(outcome)
}

/// Consumes the value token(s) a matched option is owed, per its arity.
fn consume_value(
    command: &Command,
    spec: &OptionSpec,
    attached: Option<String>,
    queue: &mut VecDeque<String>,
) -> Result<Option<String>, ParseError> {
    match spec.arity {
        ValueArity::Required => {
            if attached.is_some() {
                return Ok(attached);
            }
            match queue.front() {
                Some(next) if !looks_like_option(next) => Ok(queue.pop_front()),
                _ => Err(ParseError::option_missing_argument(&command.name, spec)),
            }
        }
        ValueArity::Optional => {
            if attached.is_some() {
                return Ok(attached);
            }
            match queue.front() {
                Some(next) if !looks_like_option(next) => Ok(queue.pop_front()),
                _ => Ok(None),
            }
        }
        ValueArity::None => Ok(None),
    }
}

/// Coerces and stores one option occurrence, threading the previously
/// accumulated value so counting and appending coercers work.
fn apply_option(
    command: &Command,
    spec: &OptionSpec,
    raw: Option<&str>,
    values: &mut BTreeMap<String, Value>,
) -> Result<(), ParseError> {
    let key = spec.key();
    let previous = values.get(&key).cloned();

    let value = match raw {
        Some(raw) => match &spec.coerce {
            Some(coercer) => coercer.apply(raw, previous.as_ref()).map_err(|reason| {
                ParseError::invalid_option_argument(&command.name, &spec.flags, &reason)
            })?,
            None if spec.variadic => {
                let mut items = match previous {
                    Some(Value::List(items)) => items,
                    _ => Vec::new(),
                };
                items.push(Value::Str(raw.to_string()));
                Value::List(items)
            }
            None => Value::Str(raw.to_string()),
        },
        None if spec.negatable => Value::Bool(false),
        None => match &spec.coerce {
            // A valueless occurrence still runs the coercer, with an empty
            // raw token, so counting coercers see every occurrence.
            Some(coercer) => coercer.apply("", previous.as_ref()).map_err(|reason| {
                ParseError::invalid_option_argument(&command.name, &spec.flags, &reason)
            })?,
            None => Value::Bool(true),
        },
    };

    values.insert(key, value);
    Ok(())
}

/// Parses one node and recurses through subcommand delegation, binding at
/// the matched node and invoking its action handler.
pub(crate) fn parse_node(
    command: &Command,
    tokens: Vec<String>,
    mut path: Vec<String>,
    mut globals: BTreeMap<String, Value>,
) -> Result<Invocation, ParseError> {
    let scan = scan_node(command, tokens, true)?;

    if let Some((child, rest)) = scan.delegate {
        // The parent's slice is fully consumed at the delegation point, so
        // its defaults and mandatory checks run now.
        let parent_values = bind::finalize_options(command, scan.values)?;
        globals.extend(parent_values);
        path.push(child.name.clone());
        return parse_node(child, rest, path, globals);
    }

    if !command.subcommands.is_empty() && command.action.is_none() {
        if let Some(first) = scan.operands.first() {
            return Err(ParseError::unknown_command(&command.name, first));
        }
        debug!(command = %command.name, "no subcommand resolved, help outcome");
        return Err(ParseError::help_display(
            &command.name,
            command.help_text(),
            false,
        ));
    }

    let option_values = bind::finalize_options(command, scan.values)?;
    let (arg_values, surplus) = bind::bind_arguments(command, &scan.operands)?;

    // Nodes that neither declare arguments nor attach an action leave
    // their operands to the caller, so the excess check does not apply.
    let binds_operands = !command.arguments.is_empty() || command.action.is_some();
    if binds_operands
        && surplus.len() > scan.unknown_operands
        && !command.allow_excess_arguments
    {
        return Err(ParseError::excess_arguments(&command.name, &surplus));
    }

    let invocation = Invocation {
        path,
        option_values,
        globals,
        arg_values,
        operands: scan.operands,
        unknown: scan.unknown,
    };

    if let Some(action) = &command.action {
        action.invoke(&invocation)?;
    }

    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scan_separates_options_from_operands() {
        let cmd = Command::new("prog")
            .option("-v, --verbose", "")
            .option("-o, --output <file>", "");
        let scan = scan_node(&cmd, tokens(&["-v", "a", "-o", "out.bin", "b"]), true).unwrap();
        assert_eq!(scan.operands, vec!["a", "b"]);
        assert_eq!(scan.values["verbose"], Value::Bool(true));
        assert_eq!(scan.values["output"], Value::Str("out.bin".to_string()));
    }

    #[test]
    fn test_scan_required_value_rejects_option_shaped_token() {
        let cmd = Command::new("prog")
            .option("-o, --output <file>", "")
            .option("-v, --verbose", "");
        let err = scan_node(&cmd, tokens(&["--output", "--verbose"]), true).unwrap_err();
        assert_eq!(err.code.as_str(), "cmdtree.optionMissingArgument");
    }

    #[test]
    fn test_scan_optional_value_skips_option_shaped_token() {
        let cmd = Command::new("prog")
            .option("-p, --pepper [level]", "")
            .option("-v, --verbose", "");
        let scan = scan_node(&cmd, tokens(&["--pepper", "--verbose"]), true).unwrap();
        assert_eq!(scan.values["pepper"], Value::Bool(true));
        assert_eq!(scan.values["verbose"], Value::Bool(true));
    }

    #[test]
    fn test_scan_variadic_option_consumes_until_option() {
        let cmd = Command::new("prog")
            .option("--tag <names...>", "")
            .option("-v, --verbose", "");
        let scan = scan_node(&cmd, tokens(&["--tag", "a", "b", "-v", "c"]), true).unwrap();
        assert_eq!(
            scan.values["tag"],
            Value::List(vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string())
            ])
        );
        assert_eq!(scan.operands, vec!["c"]);
    }

    #[test]
    fn test_scan_cluster_expansion_binds_each_flag() {
        let cmd = Command::new("prog")
            .option("-x, --extract", "")
            .option("-v, --verbose", "")
            .option("-f, --file <path>", "");
        let scan = scan_node(&cmd, tokens(&["-xvf", "archive.tar"]), true).unwrap();
        assert_eq!(scan.values["extract"], Value::Bool(true));
        assert_eq!(scan.values["verbose"], Value::Bool(true));
        assert_eq!(scan.values["file"], Value::Str("archive.tar".to_string()));
    }

    #[test]
    fn test_scan_negation_binds_false() {
        let cmd = Command::new("prog").option("--no-color", "");
        let scan = scan_node(&cmd, tokens(&["--no-color"]), true).unwrap();
        assert_eq!(scan.values["color"], Value::Bool(false));
    }

    #[test]
    fn test_scan_terminator_keeps_option_shaped_operands() {
        let cmd = Command::new("prog").option("-v, --verbose", "");
        let scan = scan_node(&cmd, tokens(&["--", "-v", "--verbose", "sub"]), true).unwrap();
        assert_eq!(scan.operands, vec!["-v", "--verbose", "sub"]);
        assert!(scan.values.is_empty());
    }

    #[test]
    fn test_scan_unknown_option_fails_fast_by_default() {
        let cmd = Command::new("prog").option("-p, --pepper", "");
        let err = scan_node(&cmd, tokens(&["-m", "operand"]), true).unwrap_err();
        assert_eq!(err.code.as_str(), "cmdtree.unknownOption");
        assert_eq!(err.command, "prog");
    }
}
