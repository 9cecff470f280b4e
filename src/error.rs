use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read env file `{}`: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("child process exited with {0}")]
    ChildExit(ExitStatus),
}

impl Error {
    /// Process exit code this error should map to.
    ///
    /// A child that exited with a code has it mirrored; everything else,
    /// including a child killed by a signal, maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ChildExit(status) => status.code().unwrap_or(1),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The line scanner failed to advance past a statement.
    #[error("scanner made no progress")]
    Stalled,
}
