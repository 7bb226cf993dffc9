mod commands;
mod helpers;

use clap::Parser;
use linesynth_core::LineShapeError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let line_shape_error = error.as_line_shape_error();
            eprintln!("{}", line_shape_error.diagnostic_line());
            line_shape_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .try_init();
}

#[derive(Parser)]
#[command(name = "linesynth", about = "Spectral emission-line shape synthesis")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Synthesize a line profile from a JSON run file
    Synthesize(commands::SynthesizeArgs),
    /// List the Zeeman components of the run file's transition
    Zeeman(commands::ZeemanArgs),
    /// List the built-in line presets
    Presets,
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Synthesize(args) => commands::run_synthesize_command(args),
        CliCommand::Zeeman(args) => commands::run_zeeman_command(args),
        CliCommand::Presets => commands::run_presets_command(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(LineShapeError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<LineShapeError> for CliError {
    fn from(error: LineShapeError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_line_shape_error(&self) -> LineShapeError {
        match self {
            Self::Usage(message) => {
                LineShapeError::invalid_parameter("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => LineShapeError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
