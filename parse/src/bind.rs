//! Binding of scanned raw values into the final typed result.
//!
//! Runs once per command node after its token slice is fully classified:
//! option defaults and mandatory checks, then positional binding of
//! operands to declared arguments with coercion. Requirement checks never
//! fire mid-stream; the scan has always completed first.

use std::collections::BTreeMap;

use cmdtree_core::{ArgSpec, Command, ParseError, Value};

/// Applies option defaults and enforces mandatory options.
///
/// A mandatory option with a default is satisfied by the default.
/// Negatable flags never supplied preset to `Bool(true)` so the negation
/// has something to flip.
pub(crate) fn finalize_options(
    command: &Command,
    mut values: BTreeMap<String, Value>,
) -> Result<BTreeMap<String, Value>, ParseError> {
    for spec in &command.options {
        let key = spec.key();
        if values.contains_key(&key) {
            continue;
        }
        if let Some(default) = &spec.default {
            values.insert(key, default.clone());
        } else if spec.negatable {
            values.insert(key, Value::Bool(true));
        } else if spec.mandatory {
            return Err(ParseError::missing_mandatory_option(&command.name, spec));
        }
    }
    Ok(values)
}

/// Binds operands to declared arguments positionally.
///
/// Returns the bound values (in declaration order, `None` for an optional
/// argument neither supplied nor defaulted) and the surplus operands left
/// over when no variadic argument absorbs them.
pub(crate) fn bind_arguments(
    command: &Command,
    operands: &[String],
) -> Result<(Vec<Option<Value>>, Vec<String>), ParseError> {
    let mut bound = Vec::with_capacity(command.arguments.len());
    let mut index = 0;

    for spec in &command.arguments {
        if spec.variadic {
            // Validation guarantees a variadic argument is declared last.
            let items = &operands[index..];
            index = operands.len();
            if items.is_empty() && spec.required {
                return Err(ParseError::missing_argument(&command.name, &spec.name));
            }
            bound.push(Some(bind_variadic(command, spec, items)?));
        } else if index < operands.len() {
            let raw = &operands[index];
            index += 1;
            bound.push(Some(coerce_operand(command, spec, raw, None)?));
        } else if spec.required {
            return Err(ParseError::missing_argument(&command.name, &spec.name));
        } else {
            bound.push(spec.default.clone());
        }
    }

    Ok((bound, operands[index..].to_vec()))
}

/// Collects a variadic argument's items. Without a coercer the result is a
/// list of raw strings; with one, the coercer threads the accumulated
/// value across items and its final result is the bound value.
fn bind_variadic(
    command: &Command,
    spec: &ArgSpec,
    items: &[String],
) -> Result<Value, ParseError> {
    match &spec.coerce {
        Some(_) => {
            let mut accumulated = None;
            for raw in items {
                accumulated = Some(coerce_operand(command, spec, raw, accumulated.as_ref())?);
            }
            Ok(accumulated.unwrap_or(Value::List(Vec::new())))
        }
        None => Ok(Value::List(
            items.iter().map(|raw| Value::Str(raw.clone())).collect(),
        )),
    }
}

fn coerce_operand(
    command: &Command,
    spec: &ArgSpec,
    raw: &str,
    previous: Option<&Value>,
) -> Result<Value, ParseError> {
    match &spec.coerce {
        Some(coercer) => coercer.apply(raw, previous).map_err(|reason| {
            ParseError::invalid_option_argument(&command.name, &spec.name, &reason)
        }),
        None => Ok(Value::Str(raw.to_string())),
    }
}
