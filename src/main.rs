use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hintpoint::config::Config;
use hintpoint::detect::default_strategies;
use hintpoint::error::AppResult;
use hintpoint::hints::HintMode;
use hintpoint::platform::default_platform;
use hintpoint::session::{SessionOutcome, SmartHintSession};

/// Keyboard-driven pointer control: overlays labeled hints on the
/// interactive elements of the current screen and moves the pointer to
/// the one you pick.
#[derive(Debug, Parser)]
#[command(name = "hintpoint", version)]
struct Cli {
    /// Config file to use instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label mode override: "numeric" or "alphabet".
    #[arg(long)]
    mode: Option<String>,

    /// Print the outcome as JSON instead of "x y label".
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(outcome) => report(&outcome, cli.json),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AppResult<SessionOutcome> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(mode) = &cli.mode {
        config.hints.mode = parse_mode(mode)?;
    }

    let mut platform = default_platform()?;
    let mut session = SmartHintSession::new(&config, platform.as_mut());
    session.run(default_strategies())
}

fn parse_mode(value: &str) -> AppResult<HintMode> {
    match value {
        "numeric" => Ok(HintMode::Numeric),
        "alphabet" => Ok(HintMode::Alphabetic),
        other => Err(hintpoint::error::AppError::invalid_argument(format!(
            "unknown hint mode {other:?} (expected \"numeric\" or \"alphabet\")"
        ))),
    }
}

fn report(outcome: &SessionOutcome, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(outcome) {
            Ok(encoded) => println!("{encoded}"),
            Err(err) => {
                eprintln!("failed to encode outcome: {err}");
                return ExitCode::FAILURE;
            }
        }
        return match outcome {
            SessionOutcome::Selected { .. } => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        };
    }

    match outcome {
        SessionOutcome::Selected { x, y, label } => {
            println!("{x} {y} {label}");
            ExitCode::SUCCESS
        }
        SessionOutcome::Cancelled => ExitCode::FAILURE,
        SessionOutcome::Failed { message } => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hintpoint={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
