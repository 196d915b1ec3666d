//! Typed values and coercion.
//!
//! A [`Value`] is what an option or positional argument binds to after
//! parsing. Raw tokens are strings; a [`Coercer`] turns a raw string into a
//! typed value, receiving the previously accumulated value so that counting
//! and appending patterns work.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Value, Coercer};
//!
//! let int = cmdtree_core::coerce::int();
//! assert_eq!(int.apply("42", None), Ok(Value::Int(42)));
//! assert!(int.apply("forty-two", None).is_err());
//!
//! let count = cmdtree_core::coerce::count();
//! let once = count.apply("", None).unwrap();
//! let twice = count.apply("", Some(&once)).unwrap();
//! assert_eq!(twice, Value::Int(2));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A typed value bound from the command line.
///
/// Untagged in serialized form, so an invocation dumps to natural JSON
/// (`true`, `3`, `"path"`, `["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag state.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value (the default for value-bearing options).
    Str(String),
    /// Accumulated values of a variadic option or argument.
    List(Vec<Value>),
}

impl Value {
    /// Returns the boolean state, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the list items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

/// A coercion function from raw token text to a typed [`Value`].
///
/// The second parameter is the previously accumulated value for the same
/// option key, which lets coercers implement counting (`-vvv`) and
/// appending (`--tag a --tag b`) without engine support. A rejection
/// message becomes an `invalidOptionArgument` parse error.
#[derive(Clone)]
pub struct Coercer(Arc<CoerceFn>);

type CoerceFn = dyn Fn(&str, Option<&Value>) -> Result<Value, String> + Send + Sync;

impl Coercer {
    /// Wraps a closure as a coercer.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Applies the coercer to one raw token.
    pub fn apply(&self, raw: &str, previous: Option<&Value>) -> Result<Value, String> {
        (self.0)(raw, previous)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Coercer")
    }
}

/// Stock coercers for common option shapes.
pub mod coerce {
    use super::{Coercer, Value};

    /// Identity coercion: the raw string becomes `Value::Str` unchanged.
    pub fn identity() -> Coercer {
        Coercer::new(|raw, _| Ok(Value::Str(raw.to_string())))
    }

    /// Parses the raw token as an `i64`.
    pub fn int() -> Coercer {
        Coercer::new(|raw, _| {
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("'{raw}' is not an integer"))
        })
    }

    /// Parses the raw token as an `f64`.
    pub fn float() -> Coercer {
        Coercer::new(|raw, _| {
            raw.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("'{raw}' is not a number"))
        })
    }

    /// Counts occurrences, ignoring the raw token (`-vvv` → 3).
    pub fn count() -> Coercer {
        Coercer::new(|_, previous| {
            let so_far = match previous {
                Some(Value::Int(n)) => *n,
                _ => 0,
            };
            Ok(Value::Int(so_far + 1))
        })
    }

    /// Appends each raw token to a list.
    pub fn append() -> Coercer {
        Coercer::new(|raw, previous| {
            let mut items = match previous {
                Some(Value::List(items)) => items.clone(),
                _ => Vec::new(),
            };
            items.push(Value::Str(raw.to_string()));
            Ok(Value::List(items))
        })
    }

    /// Accepts only one of the given choices, binding the matched string.
    pub fn one_of(choices: &[&str]) -> Coercer {
        let choices: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
        Coercer::new(move |raw, _| {
            if choices.iter().any(|c| c == raw) {
                Ok(Value::Str(raw.to_string()))
            } else {
                Err(format!("'{raw}' is not one of {}", choices.join(", ")))
            }
        })
    }
}
