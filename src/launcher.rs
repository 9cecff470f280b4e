use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::env::{Environ, build_environ};
use crate::error::Error;
use crate::loader::load_env_file;

/// A program to spawn with an explicit environment.
///
/// Standard input, output and error are inherited from this process.
#[derive(Debug, Clone)]
pub struct Launch {
    program: OsString,
    args: Vec<OsString>,
    environ: Environ,
}

impl Launch {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            environ: Environ::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn environ(mut self, environ: Environ) -> Self {
        self.environ = environ;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Build the underlying command. The child sees exactly `environ`.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env_clear()
            .envs(self.environ.iter());
        command
    }

    /// Spawn the program and wait for it to terminate.
    pub fn status(&self) -> Result<ExitStatus, Error> {
        debug!(
            program = %self.program().to_string_lossy(),
            args = self.args.len(),
            env = self.environ.len(),
            "spawning child process"
        );

        let status = self.command().status().map_err(|source| Error::Launch {
            program: self.program().to_string_lossy().into_owned(),
            source,
        })?;

        debug!(%status, "child process exited");
        Ok(status)
    }

    /// Like [`Launch::status`], but a non-zero exit becomes
    /// [`Error::ChildExit`].
    pub fn run(&self) -> Result<(), Error> {
        let status = self.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ChildExit(status))
        }
    }
}

/// Load `env_path`, merge it onto the inherited environment and run
/// `program` with `args`.
pub fn run_with_env_file<A>(env_path: &Path, program: &OsStr, args: &[A]) -> Result<(), Error>
where
    A: AsRef<OsStr>,
{
    let decoded = load_env_file(env_path)?;
    info!(
        path = %env_path.display(),
        vars = decoded.len(),
        "loaded env file"
    );

    let environ = build_environ(Environ::inherited(), &decoded);
    Launch::new(program)
        .args(args.iter().map(|arg| arg.as_ref().to_os_string()))
        .environ(environ)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_replaces_environment() {
        let mut environ = Environ::new();
        environ.push("A", "1");
        environ.push("A", "2");

        let launch = Launch::new("printenv").arg("A").environ(environ);
        assert_eq!(launch.program(), OsStr::new("printenv"));
        let command = launch.command();

        assert_eq!(command.get_program(), OsStr::new("printenv"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("A")]);

        let envs: Vec<(&OsStr, Option<&OsStr>)> = command.get_envs().collect();
        assert_eq!(envs, vec![(OsStr::new("A"), Some(OsStr::new("2")))]);
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let err = Launch::new("envy-definitely-not-a-real-program")
            .run()
            .expect_err("spawn should fail");

        match err {
            Error::Launch { program, .. } => {
                assert_eq!(program, "envy-definitely-not-a-real-program");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
