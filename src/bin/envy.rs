use std::process;

use envy::cli::{self, CliArgs};
use envy::{Error, logging, run_with_env_file};
use tracing::{debug, error};

fn main() {
    let args = match cli::parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(cli::parse_exit_code(&err));
        }
    };
    process::exit(run(args));
}

fn run(args: CliArgs) -> i32 {
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("envy: failed to initialise logging: {err}");
    }

    let Some((program, program_args)) = args.split_command() else {
        error!("missing command to run");
        return 1;
    };

    match run_with_env_file(&args.env_file, program, program_args) {
        Ok(()) => 0,
        Err(err @ Error::ChildExit(_)) => {
            debug!(error = %err, "child process failed");
            err.exit_code()
        }
        Err(err) => {
            error!(error = %err, "envy failed");
            err.exit_code()
        }
    }
}
