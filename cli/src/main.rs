//! `cmdtree-demo`: a small file-chunking CLI declared entirely with
//! `cmdtree-core` and driven by `cmdtree-parse` in exit mode.
//!
//! The tool does no real I/O; each action prints a JSON summary of its
//! bound invocation so the parsing behavior is observable end to end.

use std::env;

use cmdtree_core::{ArgSpec, Command, Invocation, OptionSpec, ParseError, Value, coerce};
use cmdtree_parse::parse;

fn main() {
    let program = build_program();
    parse(&program, env::args().skip(1));
}

fn build_program() -> Command {
    Command::new("chunker")
        .with_description("split and join files in fixed-size chunks")
        .version(env!("CARGO_PKG_VERSION"))
        .option("-v, --verbose", "enable verbose output")
        .subcommand(split_command())
        .subcommand(join_command())
        .subcommand(inspect_command())
}

fn split_command() -> Command {
    Command::new("split")
        .alias("sp")
        .with_description("split an input file into numbered chunks")
        .with_option(
            OptionSpec::new("-n, --parts <count>")
                .with_description("number of chunks to produce")
                .with_coercer(coerce::int())
                .with_default(Value::Int(2)),
        )
        .with_option(
            OptionSpec::new("--prefix <name>")
                .with_description("filename prefix for produced chunks")
                .with_default(Value::Str("chunk".to_string())),
        )
        .option("--no-pad", "do not zero-pad chunk numbers")
        .argument("<input>", "file to split")
        .argument("[outputs...]", "explicit output names")
        .action(|inv| report("split", inv))
}

fn join_command() -> Command {
    Command::new("join")
        .with_description("concatenate chunks back into one file")
        .with_option(
            OptionSpec::new("-o, --output <file>")
                .with_description("path of the joined file")
                .mandatory(),
        )
        .with_option(
            OptionSpec::new("--tag <name>")
                .with_description("metadata tag, repeatable")
                .with_coercer(coerce::append()),
        )
        .argument("<inputs...>", "chunk files in order")
        .action(|inv| report("join", inv))
}

fn inspect_command() -> Command {
    Command::new("inspect")
        .with_description("describe a chunk set, forwarding unrecognized flags")
        .allow_unknown_options()
        .with_argument(ArgSpec::new("[target]").with_description("chunk set to describe"))
        .action(|inv| report("inspect", inv))
}

/// Prints the bound invocation as a JSON document on stdout.
fn report(operation: &str, inv: &Invocation) -> Result<(), ParseError> {
    let summary = serde_json::json!({
        "operation": operation,
        "path": inv.path,
        "options": inv.opts_with_globals(),
        "args": inv.arg_values,
        "operands": inv.operands,
    });
    println!("{summary:#}");
    Ok(())
}
