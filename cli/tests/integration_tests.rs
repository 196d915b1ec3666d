use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdtree-demo"))
        .args(args)
        .output()
        .expect("failed to run cmdtree-demo")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Display outcomes
// ---------------------------------------------------------------------------

#[test]
fn bare_invocation_prints_help_to_stderr_and_fails() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_text(&out).contains("Usage: chunker"));
}

#[test]
fn explicit_help_flag_prints_to_stdout_and_succeeds() {
    let out = run(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage: chunker"));
}

#[test]
fn version_flag_prints_package_version() {
    let out = run(&["--version"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}

// ---------------------------------------------------------------------------
// Successful invocations
// ---------------------------------------------------------------------------

#[test]
fn split_binds_options_and_argument() {
    let out = run(&["split", "-n", "3", "data.bin"]);
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["operation"], "split");
    assert_eq!(json["path"], serde_json::json!(["chunker", "split"]));
    assert_eq!(json["options"]["parts"], 3);
    assert_eq!(json["args"][0], "data.bin");
}

#[test]
fn split_defaults_apply_when_options_omitted() {
    let out = run(&["split", "data.bin"]);
    let json = stdout_json(&out);
    assert_eq!(json["options"]["parts"], 2);
    assert_eq!(json["options"]["prefix"], "chunk");
    assert_eq!(json["options"]["pad"], true);
}

#[test]
fn split_negation_flag_binds_false() {
    let out = run(&["split", "--no-pad", "data.bin"]);
    let json = stdout_json(&out);
    assert_eq!(json["options"]["pad"], false);
}

#[test]
fn global_option_reaches_subcommand() {
    let out = run(&["-v", "split", "data.bin"]);
    let json = stdout_json(&out);
    assert_eq!(json["options"]["verbose"], true);
}

#[test]
fn alias_routes_to_subcommand() {
    let out = run(&["sp", "data.bin"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout_json(&out)["operation"], "split");
}

#[test]
fn join_collects_variadic_inputs_and_repeated_tags() {
    let out = run(&["join", "-o", "out.bin", "a.bin", "b.bin", "--tag", "x", "--tag", "y"]);
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["options"]["output"], "out.bin");
    assert_eq!(json["options"]["tag"], serde_json::json!(["x", "y"]));
    assert_eq!(json["args"][0], serde_json::json!(["a.bin", "b.bin"]));
}

#[test]
fn terminator_keeps_option_shaped_operand() {
    let out = run(&["split", "--", "-n"]);
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["args"][0], "-n");
    assert_eq!(json["options"]["parts"], 2);
}

#[test]
fn inspect_keeps_allowed_unknown_flags_as_operands() {
    let out = run(&["inspect", "target", "--weird"]);
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["operands"], serde_json::json!(["target", "--weird"]));
    assert_eq!(json["args"][0], "target");
}

// ---------------------------------------------------------------------------
// Failure diagnostics
// ---------------------------------------------------------------------------

#[test]
fn unknown_option_reports_error_and_usage() {
    let out = run(&["split", "--bogus", "data.bin"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr_text(&out);
    assert!(err.contains("error: unknown option '--bogus'"));
    assert!(err.contains("Usage: split"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let out = run(&["frobnicate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_text(&out).contains("unknown command 'frobnicate'"));
}

#[test]
fn missing_mandatory_option_is_rejected() {
    let out = run(&["join", "a.bin"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_text(&out).contains("required option '-o, --output <file>' not specified"));
}

#[test]
fn missing_required_argument_is_rejected() {
    let out = run(&["split"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_text(&out).contains("missing required argument 'input'"));
}

#[test]
fn non_integer_part_count_is_rejected() {
    let out = run(&["split", "-n", "many", "data.bin"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_text(&out).contains("invalid value"));
}
