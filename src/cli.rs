//! Command-line surface. A short getopt-style scan over `std::env::args()` —
//! the external surface here is five boolean flags and one valued flag, so a
//! derive-macro argument parser would outweigh the thing it configures.

use std::path::PathBuf;

use crate::config::{Config, OutputTarget};
use crate::error::RecoverError;

pub const USAGE: &str = "Usage: gzrecover [-hpsVv] [-o <outfile>] [infile]";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of parsing argv, before any I/O has happened.
pub enum CliAction {
    /// `-h`: print usage to stderr and exit 0 without running anything.
    Help,
    /// Proceed to run with this configuration.
    Run(Config),
}

/// Parse CLI arguments in the style of `getopt("ho:psVv")`.
///
/// Short flags may be combined in one token (`-sv`) and `-o`'s value may
/// either be attached (`-oNAME`) or be the next token (`-o NAME`), matching
/// traditional getopt behavior. Only the first positional argument is used
/// as the input filename; extra positionals are silently ignored rather
/// than rejected.
pub fn parse<I>(mut args: I) -> Result<CliAction, RecoverError>
where
    I: Iterator<Item = String>,
{
    let mut split = false;
    let mut verbose = false;
    let mut print_version_banner = false;
    let mut output_name: Option<String> = None;
    let mut stdout_requested = false;
    let mut input_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "-" || !arg.starts_with('-') {
            if input_path.is_none() {
                input_path = Some(PathBuf::from(arg));
            }
            continue;
        }

        let mut chars = arg[1..].chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                'h' => return Ok(CliAction::Help),
                'p' => stdout_requested = true,
                's' => split = true,
                'v' => verbose = true,
                'V' => print_version_banner = true,
                'o' => {
                    let rest: String = chars.by_ref().collect();
                    let value = if !rest.is_empty() {
                        rest
                    } else {
                        args.next().ok_or_else(|| {
                            RecoverError::Usage(format!(
                                "gzrecover: option requires an argument -- 'o'\n{USAGE}"
                            ))
                        })?
                    };
                    output_name = Some(value);
                    break;
                }
                other => {
                    return Err(RecoverError::Usage(format!(
                        "gzrecover: invalid option -- '{other}'\n{USAGE}"
                    )))
                }
            }
        }
    }

    if output_name.is_some() && stdout_requested {
        return Err(RecoverError::Usage(
            "gzrecover: Cannot specify output filename (-o) and stdout (-p) simultaneously.\n"
                .to_string()
                + USAGE,
        ));
    }

    let output = if stdout_requested {
        OutputTarget::Stdout
    } else if let Some(name) = output_name {
        OutputTarget::Named(name)
    } else {
        OutputTarget::Derived
    };

    let config = Config::default()
        .with_input_path(input_path)
        .with_output(output)
        .with_split(split)
        .with_verbose(verbose);
    let config = Config { print_version_banner, ..config };

    Ok(CliAction::Run(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<CliAction, RecoverError> {
        parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn help_short_circuits() {
        assert!(matches!(parse_args(&["-h"]), Ok(CliAction::Help)));
    }

    #[test]
    fn plain_positional_is_input_path() {
        let CliAction::Run(cfg) = parse_args(&["input.gz"]).unwrap() else { panic!() };
        assert_eq!(cfg.input_path, Some(PathBuf::from("input.gz")));
        assert_eq!(cfg.output, OutputTarget::Derived);
    }

    #[test]
    fn split_and_verbose_combine_in_one_token() {
        let CliAction::Run(cfg) = parse_args(&["-sv", "in.gz"]).unwrap() else { panic!() };
        assert!(cfg.split);
        assert!(cfg.verbose);
    }

    #[test]
    fn o_accepts_attached_and_separate_value() {
        let CliAction::Run(cfg) = parse_args(&["-oout.txt"]).unwrap() else { panic!() };
        assert_eq!(cfg.output, OutputTarget::Named("out.txt".to_string()));

        let CliAction::Run(cfg) = parse_args(&["-o", "out.txt"]).unwrap() else { panic!() };
        assert_eq!(cfg.output, OutputTarget::Named("out.txt".to_string()));
    }

    #[test]
    fn o_and_p_are_mutually_exclusive() {
        assert!(parse_args(&["-o", "x", "-p"]).is_err());
    }

    #[test]
    fn missing_o_value_is_usage_error() {
        assert!(parse_args(&["-o"]).is_err());
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        assert!(parse_args(&["-z"]).is_err());
    }

    #[test]
    fn no_input_path_means_stdin() {
        let CliAction::Run(cfg) = parse_args(&["-v"]).unwrap() else { panic!() };
        assert_eq!(cfg.input_path, None);
    }
}
