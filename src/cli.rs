//! Command-line arguments, parsed with `clap`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `envy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "envy",
    version,
    about = "Run a command with variables loaded from a dotenv file.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ENVY_LOG` or `warn` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Dotenv file to load.
    #[arg(value_name = "ENVFILE")]
    pub env_file: PathBuf,

    /// Program to run, followed by arguments forwarded to it verbatim.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl CliArgs {
    /// The program and its arguments.
    pub fn split_command(&self) -> Option<(&OsString, &[OsString])> {
        self.command.split_first()
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse process arguments without exiting on failure.
pub fn parse() -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Exit code for a failed argument parse: `0` for `--help`/`--version`
/// output, `1` for usage errors.
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}
