//! Load a `.env` file and run a command with its variables.
//!
//! [`parse`] decodes dotenv text into a map and never fails on malformed
//! lines; they are skipped. [`build_environ`] merges that map onto an
//! explicitly supplied inherited environment, and [`Launch`] spawns a program
//! with the result. [`run_with_env_file`] wires the three together.

pub mod cli;
mod env;
mod error;
mod launcher;
mod loader;
pub mod logging;
mod model;
mod parser;

pub use env::{Environ, build_environ};
pub use error::{Error, ParseError, ParseErrorKind};
pub use launcher::{Launch, run_with_env_file};
pub use loader::{load_env_file, read_env_file};
pub use model::{Entry, EnvMap, to_map};
pub use parser::{parse, parse_bytes, parse_reader, parse_str};
