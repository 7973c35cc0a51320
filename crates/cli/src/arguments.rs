//! Command definition and argument parsing.

use std::env;
use std::ffi::OsString;

use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, Command};
use logging::MAX_VERBOSE_LEVEL;

/// Name used in usage output and diagnostics.
pub(crate) const PROGRAM_NAME: &str = "pipetee";

/// Environment variable supplying a default `--size`.
pub const SIZE_ENV: &str = "PIPETEE_SIZE";

/// Parsed command produced by [`parse_args`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// `-h`/`--help` was given.
    pub show_help: bool,
    /// `-V`/`--version` was given.
    pub show_version: bool,
    /// Diagnostic level: `0` with `--quiet`, otherwise `1` plus the number
    /// of `-v` flags, capped at [`MAX_VERBOSE_LEVEL`].
    pub verbosity: u8,
    /// Staging buffer size override in bytes, `0` when unset or unparseable.
    pub size: usize,
    /// Destination operands in command line order.
    pub destinations: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .short('s')
                .value_name("BYTES")
                .help("Staging buffer size; accepts K and M suffixes.")
                .allow_negative_numbers(true)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; may be repeated.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only report errors.")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("destinations")
                .value_name("FILE")
                .help("Destination files that receive a copy of standard input.")
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new())
                .required_unless_present_any(["help", "version"]),
        )
}

/// Parses command-line arguments, reading the default size from
/// [`SIZE_ENV`].
///
/// # Errors
///
/// Returns the `clap` error describing the usage problem.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    parse_args_with_env(arguments, env::var_os(SIZE_ENV))
}

/// Parses command-line arguments with an explicit [`SIZE_ENV`] value.
pub(crate) fn parse_args_with_env<I, S>(
    arguments: I,
    env_size: Option<OsString>,
) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let show_help = matches.get_flag("help");
    let show_version = matches.get_flag("version");
    let verbosity = if matches.get_flag("quiet") {
        0
    } else {
        matches
            .get_count("verbose")
            .saturating_add(1)
            .min(MAX_VERBOSE_LEVEL)
    };
    let size = matches
        .remove_one::<OsString>("size")
        .or(env_size)
        .map_or(0, |value| parse_size(&value.to_string_lossy()));
    let destinations = matches
        .remove_many::<OsString>("destinations")
        .map(|values| values.collect())
        .unwrap_or_default();

    Ok(ParsedArgs {
        show_help,
        show_version,
        verbosity,
        size,
        destinations,
    })
}

/// Parses a byte count with an optional binary `K` or `M` suffix.
///
/// Anything that is not a non-negative count yields `0`, which capacity
/// negotiation treats as unset. Counts too large for `usize` saturate; range
/// checking against the staging limits happens during negotiation.
pub(crate) fn parse_size(value: &str) -> usize {
    let trimmed = value.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (digits, multiplier) = match unsigned.char_indices().last() {
        Some((index, 'k' | 'K')) => (&unsigned[..index], 1024),
        Some((index, 'm' | 'M')) => (&unsigned[..index], 1024 * 1024),
        _ => (unsigned, 1),
    };

    if negative || digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return 0;
    }

    let count = digits.parse::<u128>().unwrap_or(u128::MAX);
    let bytes = count.saturating_mul(multiplier);
    usize::try_from(bytes).unwrap_or(usize::MAX)
}
