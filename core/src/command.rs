//! Command node, builder API, and the bound invocation result.
//!
//! A [`Command`] owns a set of options, an ordered list of positional
//! arguments, zero or more child commands, and policy flags. Trees are
//! built once at program-definition time with the consuming builder
//! methods; parse-time code treats them as read-only.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Command, Value};
//!
//! let program = Command::new("chunker")
//!     .version("0.1.0")
//!     .option("-v, --verbose", "enable verbose output")
//!     .subcommand(
//!         Command::new("split")
//!             .alias("sp")
//!             .option("-n, --parts <count>", "number of chunks")
//!             .argument("<input>", "file to split"),
//!     );
//!
//! assert!(program.find_subcommand("sp").is_some());
//! assert!(program.find_option("--verbose").is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::argument::ArgSpec;
use crate::error::ParseError;
use crate::option::OptionSpec;
use crate::value::Value;

/// Action handler invoked on the matched command after successful binding.
///
/// Handler failures propagate through the same error/exit policy as parse
/// failures.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn(&Invocation) -> Result<(), ParseError> + Send + Sync>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Invocation) -> Result<(), ParseError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn invoke(&self, invocation: &Invocation) -> Result<(), ParseError> {
        (self.0)(invocation)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

/// Hook producing the help text for a command.
///
/// The engine never renders help layout itself; it only invokes this hook
/// (or falls back to the generated usage line) on the help outcome.
#[derive(Clone)]
pub struct HelpFormatter(Arc<dyn Fn(&Command) -> String + Send + Sync>);

impl HelpFormatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Command) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn format(&self, command: &Command) -> String {
        (self.0)(command)
    }
}

impl fmt::Debug for HelpFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HelpFormatter")
    }
}

/// A named command owning options, arguments, and child commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Command name as matched during routing.
    pub name: String,
    /// Alternate names matched during routing.
    pub aliases: Vec<String>,
    /// Short description shown by help collaborators.
    pub description: Option<String>,
    /// Declared options, in registration order.
    pub options: Vec<OptionSpec>,
    /// Declared positional arguments, in registration order.
    pub arguments: Vec<ArgSpec>,
    /// Child commands; names and aliases are unique within the node.
    pub subcommands: Vec<Command>,
    /// Record unrecognized option-shaped tokens instead of failing.
    pub allow_unknown_options: bool,
    /// Keep surplus operands instead of failing.
    pub allow_excess_arguments: bool,
    /// Treat the first operand and everything after it verbatim, skipping
    /// subcommand routing.
    pub pass_through_args: bool,
    /// Version string; registers `-V, --version` when set.
    pub version: Option<String>,
    /// Whether the automatic `-h, --help` flag is active.
    pub help_flag: bool,
    /// Handler invoked on the matched command.
    #[serde(skip)]
    pub action: Option<Action>,
    /// Help text hook.
    #[serde(skip)]
    pub format_help: Option<HelpFormatter>,
}

impl Command {
    /// Creates an empty command with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: None,
            options: Vec::new(),
            arguments: Vec::new(),
            subcommands: Vec::new(),
            allow_unknown_options: false,
            allow_excess_arguments: false,
            pass_through_args: false,
            version: None,
            help_flag: true,
            action: None,
            format_help: None,
        }
    }

    /// Adds a routing alias.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Declares an option from a spelling string.
    ///
    /// For defaults, coercers, or mandatory options, build an
    /// [`OptionSpec`] and use [`with_option`](Command::with_option).
    pub fn option(self, spelling: &str, description: &str) -> Self {
        self.with_option(OptionSpec::new(spelling).with_description(description))
    }

    /// Declares a fully configured option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Declares a positional argument from a name in the
    /// `<required>` / `[optional]` / `[items...]` grammar.
    pub fn argument(self, name: &str, description: &str) -> Self {
        self.with_argument(ArgSpec::new(name).with_description(description))
    }

    /// Declares a fully configured positional argument.
    pub fn with_argument(mut self, argument: ArgSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Attaches a child command.
    pub fn subcommand(mut self, child: Command) -> Self {
        self.subcommands.push(child);
        self
    }

    /// Attaches the action handler.
    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) -> Result<(), ParseError> + Send + Sync + 'static,
    {
        self.action = Some(Action::new(f));
        self
    }

    /// Sets the version string, registering `-V, --version`.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Records unrecognized option-shaped tokens instead of failing.
    pub fn allow_unknown_options(mut self) -> Self {
        self.allow_unknown_options = true;
        self
    }

    /// Keeps surplus operands instead of failing.
    pub fn allow_excess_arguments(mut self) -> Self {
        self.allow_excess_arguments = true;
        self
    }

    /// Disables subcommand routing from the first operand onward.
    pub fn pass_through_args(mut self) -> Self {
        self.pass_through_args = true;
        self
    }

    /// Removes the automatic `-h, --help` flag.
    pub fn disable_help_flag(mut self) -> Self {
        self.help_flag = false;
        self
    }

    /// Installs the help text hook.
    pub fn format_help<F>(mut self, f: F) -> Self
    where
        F: Fn(&Command) -> String + Send + Sync + 'static,
    {
        self.format_help = Some(HelpFormatter::new(f));
        self
    }

    /// Finds a child command by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| a == name))
    }

    /// Finds a declared option by exact short or long form.
    pub fn find_option(&self, token: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(token))
    }

    /// Generated single-line usage, used as the help fallback and in
    /// error diagnostics.
    pub fn usage(&self) -> String {
        let mut parts = vec![format!("Usage: {}", self.name), "[options]".to_string()];
        if !self.subcommands.is_empty() {
            parts.push("[command]".to_string());
        }
        for arg in &self.arguments {
            parts.push(arg.placeholder());
        }
        parts.join(" ")
    }

    /// Help text: the installed hook, or the generated usage line.
    pub fn help_text(&self) -> String {
        match &self.format_help {
            Some(hook) => hook.format(self),
            None => self.usage(),
        }
    }
}

/// The structured, validated result of one parse: the matched command,
/// its bound option and argument values, and the raw operand partition.
///
/// `path` runs from the root command to the matched node. `globals` holds
/// merged ancestor option values; a child key shadows a parent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Command names from root to the matched node.
    pub path: Vec<String>,
    /// Option values bound on the matched node.
    pub option_values: BTreeMap<String, Value>,
    /// Merged option values of ancestor nodes.
    pub globals: BTreeMap<String, Value>,
    /// Positional argument values, in declaration order; `None` for an
    /// optional argument that was not supplied and has no default.
    pub arg_values: Vec<Option<Value>>,
    /// Operands of the matched node, before argument binding.
    pub operands: Vec<String>,
    /// Unrecognized option-shaped tokens recorded under the
    /// allow-unknown-options policy.
    pub unknown: Vec<String>,
}

impl Invocation {
    /// Value bound for an option key on the matched node.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.option_values.get(key)
    }

    /// Whether an option key was bound (or defaulted) on the matched node.
    pub fn is_set(&self, key: &str) -> bool {
        self.option_values.contains_key(key)
    }

    /// Positional value by declaration index.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.arg_values.get(index).and_then(|v| v.as_ref())
    }

    /// The matched command's name (last path segment).
    pub fn command(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// Option values of the matched node merged over ancestor values.
    pub fn opts_with_globals(&self) -> BTreeMap<String, Value> {
        let mut merged = self.globals.clone();
        merged.extend(
            self.option_values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_subcommand_by_name_and_alias() {
        let program = Command::new("git")
            .subcommand(Command::new("checkout").alias("co"))
            .subcommand(Command::new("status"));

        assert!(program.find_subcommand("checkout").is_some());
        assert!(program.find_subcommand("co").is_some());
        assert!(program.find_subcommand("branch").is_none());
    }

    #[test]
    fn test_find_option_by_either_form() {
        let program = Command::new("prog").option("-p, --pepper [level]", "add pepper");
        assert!(program.find_option("-p").is_some());
        assert!(program.find_option("--pepper").is_some());
        assert!(program.find_option("--salt").is_none());
    }

    #[test]
    fn test_usage_line_layout() {
        let program = Command::new("chunker")
            .subcommand(Command::new("split"))
            .argument("<input>", "")
            .argument("[outputs...]", "");
        assert_eq!(
            program.usage(),
            "Usage: chunker [options] [command] <input> [outputs...]"
        );
    }

    #[test]
    fn test_opts_with_globals_child_shadows_parent() {
        let mut invocation = Invocation::default();
        invocation
            .globals
            .insert("verbose".to_string(), Value::Bool(true));
        invocation
            .globals
            .insert("format".to_string(), Value::Str("json".to_string()));
        invocation
            .option_values
            .insert("format".to_string(), Value::Str("yaml".to_string()));

        let merged = invocation.opts_with_globals();
        assert_eq!(merged["verbose"], Value::Bool(true));
        assert_eq!(merged["format"], Value::Str("yaml".to_string()));
    }
}
