use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

use linsys::loader;

/// Solve a system of linear equations with Gaussian elimination, explaining
/// every step. Every line of the input file holds the comma-separated
/// coefficients of one equation, followed by its constant term.
#[derive(Debug, Parser)]
#[command(name = "linsys", version, about, disable_version_flag = true)]
struct Cli {
    /// Path to the comma-separated file with the system
    file: PathBuf,

    /// Only print the final solution, without the step-by-step explanation
    #[arg(short, long)]
    silent: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("LINSYS_LOG"))
        .init();

    let cli = Cli::parse();

    let result = loader::read_system(&cli.file).and_then(|mut system| {
        system.solve(cli.silent)?;
        Ok(system)
    });

    match result {
        Ok(system) => {
            print!("{}", system.output());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error while solving {}: {}", cli.file.display(), e);
            ExitCode::FAILURE
        }
    }
}
