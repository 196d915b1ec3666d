//! Raw token classification.
//!
//! Classifies one token at a time against the active command's option
//! model, without consuming anything from the stream. The engine owns all
//! consumption decisions; classification here is pure.

use cmdtree_core::{Command, OptionSpec};

/// A token is option-shaped when it starts with `-` and is longer than a
/// bare dash. A lone `-` is an operand by convention (stdin placeholder),
/// and `--` is the terminator, handled before this question is asked.
pub(crate) fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Classification of one raw token against one command node.
#[derive(Debug)]
pub(crate) enum Classified<'c> {
    /// `--`: the remainder of the slice are verbatim operands.
    Terminator,
    /// A declared option, possibly with an `=`-attached or glued value.
    Matched {
        spec: &'c OptionSpec,
        attached: Option<String>,
    },
    /// First letter of a short cluster matched a boolean option; `rest` is
    /// the re-dashed remainder to reclassify (`-xyz` → `-x` + `-yz`).
    ClusterExpand {
        spec: &'c OptionSpec,
        rest: String,
    },
    /// Option-shaped but matching nothing; `ambiguous` carries the
    /// candidate long flags when an abbreviation matched more than one.
    Unknown { ambiguous: Vec<String> },
    /// Destined for positional binding or subcommand routing.
    Operand,
}

pub(crate) fn classify<'c>(command: &'c Command, token: &str) -> Classified<'c> {
    if token == "--" {
        return Classified::Terminator;
    }
    if !looks_like_option(token) {
        return Classified::Operand;
    }

    if token.starts_with("--") {
        return classify_long(command, token);
    }
    classify_short(command, token)
}

fn classify_long<'c>(command: &'c Command, token: &str) -> Classified<'c> {
    let (name, attached) = match token.split_once('=') {
        Some((name, value)) => (name.to_string(), Some(value.to_string())),
        None => (token.to_string(), None),
    };

    if let Some(spec) = command.find_option(&name) {
        // A boolean flag never takes `=value`; mirror the unknown-option
        // path so policy decides.
        if attached.is_some() && !spec.takes_value() {
            return Classified::Unknown { ambiguous: Vec::new() };
        }
        return Classified::Matched { spec, attached };
    }

    // Unambiguous-prefix resolution over registered long flags.
    if name.len() > 2 {
        let candidates: Vec<&OptionSpec> = command
            .options
            .iter()
            .filter(|o| o.long.as_deref().is_some_and(|l| l.starts_with(&name)))
            .collect();
        match candidates.as_slice() {
            [spec] => {
                if attached.is_some() && !spec.takes_value() {
                    return Classified::Unknown { ambiguous: Vec::new() };
                }
                return Classified::Matched { spec, attached };
            }
            [] => {}
            many => {
                return Classified::Unknown {
                    ambiguous: many
                        .iter()
                        .filter_map(|o| o.long.clone())
                        .collect(),
                };
            }
        }
    }

    Classified::Unknown { ambiguous: Vec::new() }
}

fn classify_short<'c>(command: &'c Command, token: &str) -> Classified<'c> {
    let mut chars = token.chars();
    chars.next(); // leading dash
    let Some(letter) = chars.next() else {
        return Classified::Operand;
    };
    let rest = chars.as_str();

    let Some(spec) = command.find_option(&format!("-{letter}")) else {
        return Classified::Unknown { ambiguous: Vec::new() };
    };

    if rest.is_empty() {
        return Classified::Matched {
            spec,
            attached: None,
        };
    }
    if spec.takes_value() {
        // -ovalue: glued value for a value-bearing short flag.
        return Classified::Matched {
            spec,
            attached: Some(rest.to_string()),
        };
    }
    // -xyz with boolean -x: consume -x, push -yz back for reclassification.
    Classified::ClusterExpand {
        spec,
        rest: format!("-{rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::Command;

    fn sample() -> Command {
        Command::new("prog")
            .option("-v, --verbose", "")
            .option("-x, --extract", "")
            .option("-o, --output <file>", "")
            .option("--verify", "")
            .option("--no-color", "")
    }

    #[test]
    fn test_terminator_and_operands() {
        let cmd = sample();
        assert!(matches!(classify(&cmd, "--"), Classified::Terminator));
        assert!(matches!(classify(&cmd, "file.txt"), Classified::Operand));
        assert!(matches!(classify(&cmd, "-"), Classified::Operand));
    }

    #[test]
    fn test_long_exact_match_with_attached_value() {
        let cmd = sample();
        match classify(&cmd, "--output=out.bin") {
            Classified::Matched { spec, attached } => {
                assert_eq!(spec.long.as_deref(), Some("--output"));
                assert_eq!(attached.as_deref(), Some("out.bin"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_boolean_long_with_attached_value_is_unknown() {
        let cmd = sample();
        assert!(matches!(
            classify(&cmd, "--verbose=yes"),
            Classified::Unknown { .. }
        ));
    }

    #[test]
    fn test_unambiguous_prefix_resolves() {
        let cmd = sample();
        match classify(&cmd, "--out") {
            Classified::Matched { spec, .. } => {
                assert_eq!(spec.long.as_deref(), Some("--output"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_prefix_reports_candidates() {
        let cmd = sample();
        match classify(&cmd, "--ver") {
            Classified::Unknown { ambiguous } => {
                assert!(ambiguous.contains(&"--verbose".to_string()));
                assert!(ambiguous.contains(&"--verify".to_string()));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_negation_matches_exactly() {
        let cmd = sample();
        match classify(&cmd, "--no-color") {
            Classified::Matched { spec, .. } => assert!(spec.negatable),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_short_cluster_expands() {
        let cmd = sample();
        match classify(&cmd, "-vxo") {
            Classified::ClusterExpand { spec, rest } => {
                assert_eq!(spec.short.as_deref(), Some("-v"));
                assert_eq!(rest, "-xo");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_short_with_glued_value() {
        let cmd = sample();
        match classify(&cmd, "-oout.bin") {
            Classified::Matched { spec, attached } => {
                assert_eq!(spec.short.as_deref(), Some("-o"));
                assert_eq!(attached.as_deref(), Some("out.bin"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_short_flag() {
        let cmd = sample();
        assert!(matches!(
            classify(&cmd, "-m"),
            Classified::Unknown { .. }
        ));
    }
}
