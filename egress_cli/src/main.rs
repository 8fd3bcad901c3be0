//! # Egress Calculator CLI
//!
//! Terminal front end for the egress calculation engine.
//!
//! ## Usage
//!
//! ```text
//! egress_cli                                   # interactive session
//! egress_cli --metric --advanced               # interactive, metric, door inputs shown
//! egress_cli calc --jurisdiction Texas --code-version 2021 \
//!     --occupancy Business --area 1000 --sprinklered true --exit-doors 2
//! egress_cli calc ... --json                   # machine-readable result
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).
//! Exit status is 2 for invalid input and 1 for file or data errors.

mod display;
mod repl;

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use egress_core::calculations::{calculate, EgressInput};
use egress_core::errors::{CalcError, CalcResult};
use egress_core::report::{render_summary, ReportContext};
use egress_core::tables::{find_state, CodeVersion, Occupancy};
use egress_core::{Session, SessionSettings, UnitSystem};

#[derive(Parser, Debug)]
#[command(name = "egress_cli")]
#[command(about = "IBC occupant load and egress width calculator")]
#[command(version)]
struct Cli {
    /// Session settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use metric units (sq. m, m, mm)
    #[arg(long, global = true)]
    metric: bool,

    /// Offer travel distance and exit-door inputs
    #[arg(long)]
    advanced: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Interactive,
    /// Calculate a single building and exit
    Calc(CalcArgs),
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// State or jurisdiction
    #[arg(long)]
    jurisdiction: Option<String>,

    /// IBC edition (2021, 2018, 2015, 2012)
    #[arg(long)]
    code_version: Option<String>,

    /// Occupancy classification (e.g. "Business", "Assembly (Standing Space)")
    #[arg(long)]
    occupancy: Option<String>,

    /// Floor area in sq. ft. (sq. m with --metric)
    #[arg(long)]
    area: Option<f64>,

    /// Automatic sprinkler system present (true/false)
    #[arg(long)]
    sprinklered: Option<bool>,

    /// Maximum travel distance in ft (m with --metric)
    #[arg(long)]
    travel_distance: Option<f64>,

    /// Number of exit doors
    #[arg(long)]
    exit_doors: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print the full plain-text summary
    #[arg(long)]
    report: bool,
}

fn load_settings(cli: &Cli) -> CalcResult<SessionSettings> {
    let mut settings = match &cli.config {
        Some(path) => SessionSettings::load(path)?,
        None => SessionSettings::default(),
    };
    if cli.metric {
        settings.default_units = UnitSystem::Metric;
    }
    if cli.advanced {
        settings.show_advanced = true;
    }
    Ok(settings)
}

fn build_input(args: &CalcArgs) -> CalcResult<EgressInput> {
    let code_version = args
        .code_version
        .as_deref()
        .map(CodeVersion::from_str_flexible)
        .transpose()?;
    let occupancy = args
        .occupancy
        .as_deref()
        .map(Occupancy::from_str_flexible)
        .transpose()?;
    let jurisdiction = args
        .jurisdiction
        .as_deref()
        .map(|j| find_state(j).map(str::to_string).unwrap_or_else(|| j.trim().to_string()));

    Ok(EgressInput {
        jurisdiction,
        code_version,
        occupancy,
        floor_area: args.area,
        sprinklered: args.sprinklered,
        travel_distance: args.travel_distance,
        exit_doors: args.exit_doors,
    })
}

fn run_calc(args: &CalcArgs, units: UnitSystem) -> CalcResult<()> {
    let input = build_input(args)?;
    let result = calculate(&input, units)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    } else if args.report {
        let context = ReportContext {
            project_name: egress_core::project::UNTITLED_PROJECT.to_string(),
            building_number: 1,
            building_count: 1,
            date: chrono::Utc::now(),
        };
        println!("{}", render_summary(&context, &input, &result));
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        display::write_result(&mut out, &input, &result).map_err(|e| {
            CalcError::file_error("write", "stdout", e.to_string())
        })?;
    }
    Ok(())
}

fn report_error(error: &CalcError, json: bool) {
    eprintln!("Error: {}", error);
    if json {
        if let Ok(json) = serde_json::to_string_pretty(error) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
    }
}

/// Exit status for a failed run: 2 for bad input, 1 for file or data errors.
fn exit_status(error: &CalcError) -> u8 {
    if error.is_user_input() {
        2
    } else {
        1
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e, false);
            return ExitCode::from(exit_status(&e));
        }
    };
    tracing::debug!(
        units = %settings.default_units,
        advanced = settings.show_advanced,
        history_limit = settings.history_limit,
        "settings loaded"
    );

    match &cli.command {
        Some(Command::Calc(args)) => match run_calc(args, settings.default_units) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_error(&e, args.json);
                ExitCode::from(exit_status(&e))
            }
        },
        Some(Command::Interactive) | None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut repl = repl::Repl::new(
                Session::new(settings),
                stdin.lock(),
                BufWriter::new(stdout.lock()),
            );
            match repl.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("I/O error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(code_version: &str, occupancy: &str) -> CalcArgs {
        CalcArgs {
            jurisdiction: Some("texas".to_string()),
            code_version: Some(code_version.to_string()),
            occupancy: Some(occupancy.to_string()),
            area: Some(1000.0),
            sprinklered: Some(true),
            travel_distance: None,
            exit_doors: None,
            json: false,
            report: false,
        }
    }

    #[test]
    fn test_build_input_canonicalizes_keys() {
        let input = build_input(&args("IBC 2015", "mercantile")).unwrap();
        assert_eq!(input.jurisdiction.as_deref(), Some("Texas"));
        assert_eq!(input.code_version, Some(CodeVersion::Ibc2015));
        assert_eq!(input.occupancy, Some(Occupancy::Mercantile));
    }

    #[test]
    fn test_build_input_unknown_keys() {
        let err = build_input(&args("1997", "Business")).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_LOOKUP_KEY");

        let err = build_input(&args("2021", "Hangar")).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_LOOKUP_KEY");
    }

    #[test]
    fn test_exit_code_distinguishes_input_errors() {
        let input_error = CalcError::missing_field("floor_area");
        assert_eq!(exit_status(&input_error), 2);

        let file_error = CalcError::file_error("open", "settings.json", "not found");
        assert_eq!(exit_status(&file_error), 1);
    }

    #[test]
    fn test_cli_parses_calc_subcommand() {
        let cli = Cli::try_parse_from([
            "egress_cli",
            "--metric",
            "calc",
            "--code-version",
            "2021",
            "--area",
            "500",
            "--sprinklered",
            "false",
        ])
        .unwrap();
        assert!(cli.metric);
        match cli.command {
            Some(Command::Calc(args)) => {
                assert_eq!(args.area, Some(500.0));
                assert_eq!(args.sprinklered, Some(false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
