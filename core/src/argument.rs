//! Positional argument model.
//!
//! An [`ArgSpec`] is declared from a name in the conventional grammar:
//! `<name>` is required, `[name]` is optional, and a trailing `...` marks
//! the slot variadic. A bare name is treated as required.

use serde::{Deserialize, Serialize};

use crate::value::{Coercer, Value};

/// Declarative definition of one positional slot.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ArgSpec;
///
/// let input = ArgSpec::new("<input>");
/// assert!(input.required);
/// assert!(!input.variadic);
///
/// let dirs = ArgSpec::new("[dirs...]");
/// assert!(!dirs.required);
/// assert!(dirs.variadic);
/// assert_eq!(dirs.name, "dirs");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Name of the argument (e.g. `"file"`).
    pub name: String,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Whether this slot greedily consumes all remaining operands.
    pub variadic: bool,
    /// Value used when an optional argument is not supplied.
    pub default: Option<Value>,
    /// Description shown by help collaborators.
    pub description: Option<String>,
    /// Coercion applied to each bound operand.
    #[serde(skip)]
    pub coerce: Option<Coercer>,
}

impl ArgSpec {
    /// Parses a name in the `<required>` / `[optional]` / `[items...]`
    /// grammar.
    pub fn new(name: &str) -> Self {
        let trimmed = name.trim();
        let (required, inner) = if let Some(inner) = trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            (true, inner)
        } else if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            (false, inner)
        } else {
            (true, trimmed)
        };

        let (inner, variadic) = match inner.strip_suffix("...") {
            Some(base) => (base, true),
            None => (inner, false),
        };

        Self {
            name: inner.to_string(),
            required,
            variadic,
            default: None,
            description: None,
            coerce: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the value used when an optional argument is not supplied.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attaches a coercion function.
    pub fn with_coercer(mut self, coerce: Coercer) -> Self {
        self.coerce = Some(coerce);
        self
    }

    /// Reconstructs the display placeholder (`<file>`, `[dirs...]`).
    pub fn placeholder(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.required {
            format!("<{}{dots}>", self.name)
        } else {
            format!("[{}{dots}]", self.name)
        }
    }
}
