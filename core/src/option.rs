//! Option model and the flag-spelling grammar.
//!
//! An [`OptionSpec`] is declared from a single spelling string in the
//! conventional grammar:
//!
//! - `"--verbose"` — boolean long flag
//! - `"-v, --verbose"` — short and long forms
//! - `"-o, --output <file>"` — required value
//! - `"-p, --pepper [level]"` — optional value
//! - `"--tag <names...>"` — variadic value
//! - `"--no-color"` — negation flag, binds `false` to the `color` key
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{OptionSpec, ValueArity};
//!
//! let opt = OptionSpec::new("-p, --pepper [level]");
//! assert_eq!(opt.short.as_deref(), Some("-p"));
//! assert_eq!(opt.long.as_deref(), Some("--pepper"));
//! assert_eq!(opt.arity, ValueArity::Optional);
//! assert_eq!(opt.key(), "pepper");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::{Coercer, Value};

/// How many value tokens an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueArity {
    /// Boolean flag, consumes nothing.
    #[default]
    None,
    /// Consumes the following token only when it is not option-shaped.
    Optional,
    /// Always consumes the following token.
    Required,
}

/// Regex patterns for the spelling grammar.
static PATTERNS: LazyLock<SpellingPatterns> = LazyLock::new(SpellingPatterns::new);

struct SpellingPatterns {
    short_flag: Regex,
    long_flag: Regex,
    value_slot: Regex,
}

impl SpellingPatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure
        // indicates a programmer error in the pattern, not a runtime condition.
        Self {
            // -v, -4, -?, -@
            short_flag: Regex::new(r"^-[a-zA-Z0-9?@]$").expect("static regex must compile"),
            // --verbose, --no-color, --log.level
            long_flag: Regex::new(r"^--[a-zA-Z][-a-zA-Z0-9.]*$")
                .expect("static regex must compile"),
            // <name>, [name], <items...>, [items...]
            value_slot: Regex::new(r"^([<\[])([^.\]>]+)(\.\.\.)?[>\]]$")
                .expect("static regex must compile"),
        }
    }
}

/// Declarative definition of one flag.
///
/// Built from a spelling string by [`OptionSpec::new`], then refined with
/// the builder methods. All mutation happens at program-definition time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Raw spelling as declared (e.g. `"-p, --pepper [level]"`).
    pub flags: String,
    /// Short form (e.g. `"-p"`).
    pub short: Option<String>,
    /// Long form (e.g. `"--pepper"`; `"--no-pepper"` for negations).
    pub long: Option<String>,
    /// Value arity.
    pub arity: ValueArity,
    /// Placeholder name of the value slot, when one is declared.
    pub value_name: Option<String>,
    /// Whether the value slot keeps consuming non-option tokens.
    pub variadic: bool,
    /// Whether this is a `--no-` negation binding `false`.
    pub negatable: bool,
    /// Whether the option must be supplied.
    pub mandatory: bool,
    /// Value used when the option is never supplied.
    pub default: Option<Value>,
    /// Description shown by help collaborators.
    pub description: Option<String>,
    /// Coercion applied to each raw value token.
    #[serde(skip)]
    pub coerce: Option<Coercer>,
}

impl OptionSpec {
    /// Parses a spelling string into an option definition.
    ///
    /// Unrecognized parts of the spelling are ignored; an option with
    /// neither a short nor a long form is caught by
    /// [`validate_command`](crate::validate_command).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{OptionSpec, ValueArity};
    ///
    /// let opt = OptionSpec::new("--tag <names...>");
    /// assert_eq!(opt.arity, ValueArity::Required);
    /// assert!(opt.variadic);
    ///
    /// let negation = OptionSpec::new("--no-color");
    /// assert!(negation.negatable);
    /// assert_eq!(negation.key(), "color");
    /// ```
    pub fn new(spelling: &str) -> Self {
        let mut short = None;
        let mut long = None;
        let mut arity = ValueArity::None;
        let mut value_name = None;
        let mut variadic = false;

        for part in spelling.split([' ', ',', '|']).filter(|p| !p.is_empty()) {
            if PATTERNS.short_flag.is_match(part) {
                short.get_or_insert_with(|| part.to_string());
            } else if PATTERNS.long_flag.is_match(part) {
                long.get_or_insert_with(|| part.to_string());
            } else if let Some(caps) = PATTERNS.value_slot.captures(part) {
                arity = if &caps[1] == "<" {
                    ValueArity::Required
                } else {
                    ValueArity::Optional
                };
                value_name = Some(caps[2].to_string());
                variadic = caps.get(3).is_some();
            }
        }

        let negatable = long
            .as_deref()
            .is_some_and(|l| l.starts_with("--no-") && l.len() > 5);

        Self {
            flags: spelling.to_string(),
            short,
            long,
            arity,
            value_name,
            variadic,
            negatable,
            mandatory: false,
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

    /// Sets the value used when the option is never supplied.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Marks the option as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Attaches a coercion function.
    pub fn with_coercer(mut self, coerce: Coercer) -> Self {
        self.coerce = Some(coerce);
        self
    }

    /// Whether the option consumes any value tokens.
    pub fn takes_value(&self) -> bool {
        self.arity != ValueArity::None
    }

    /// Storage key for bound values: the long name without dashes (and
    /// without the `no-` prefix for negations), falling back to the short
    /// letter.
    ///
    /// A negation declared as `--no-cheese` therefore shares the `cheese`
    /// key with a paired `--cheese` option.
    pub fn key(&self) -> String {
        if let Some(long) = &self.long {
            let name = long.trim_start_matches('-');
            let name = if self.negatable {
                name.trim_start_matches("no-")
            } else {
                name
            };
            name.to_string()
        } else {
            self.short
                .as_deref()
                .unwrap_or("")
                .trim_start_matches('-')
                .to_string()
        }
    }

    /// Checks whether a token name matches the short or long form exactly.
    pub fn matches(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long.as_deref() == Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_long_spelling() {
        let opt = OptionSpec::new("--verbose");
        assert_eq!(opt.short, None);
        assert_eq!(opt.long.as_deref(), Some("--verbose"));
        assert_eq!(opt.arity, ValueArity::None);
        assert!(!opt.takes_value());
    }

    #[test]
    fn test_short_and_long_with_required_value() {
        let opt = OptionSpec::new("-o, --output <file>");
        assert_eq!(opt.short.as_deref(), Some("-o"));
        assert_eq!(opt.long.as_deref(), Some("--output"));
        assert_eq!(opt.arity, ValueArity::Required);
        assert_eq!(opt.value_name.as_deref(), Some("file"));
        assert!(!opt.variadic);
    }

    #[test]
    fn test_optional_value_spelling() {
        let opt = OptionSpec::new("-p, --pepper [level]");
        assert_eq!(opt.arity, ValueArity::Optional);
        assert_eq!(opt.key(), "pepper");
    }

    #[test]
    fn test_variadic_value_spelling() {
        let opt = OptionSpec::new("--tag <names...>");
        assert!(opt.variadic);
        assert_eq!(opt.arity, ValueArity::Required);
        assert_eq!(opt.value_name.as_deref(), Some("names"));
    }

    #[test]
    fn test_negation_shares_positive_key() {
        let opt = OptionSpec::new("--no-cheese");
        assert!(opt.negatable);
        assert_eq!(opt.key(), "cheese");
        assert!(opt.matches("--no-cheese"));
        assert!(!opt.matches("--cheese"));
    }

    #[test]
    fn test_pipe_separated_spelling() {
        let opt = OptionSpec::new("-c|--cheese <kind>");
        assert_eq!(opt.short.as_deref(), Some("-c"));
        assert_eq!(opt.long.as_deref(), Some("--cheese"));
        assert_eq!(opt.arity, ValueArity::Required);
    }

    #[test]
    fn test_short_only_key_is_letter() {
        let opt = OptionSpec::new("-x");
        assert_eq!(opt.key(), "x");
    }
}
