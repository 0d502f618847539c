//! `listingkit` binary: normalize one listing workbook from the command line.

mod args;

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;
use listingkit_core::{EnumRatioType, ReportProcess};
use listingkit_io_xlsx::{SpecProcessOutcome, detect_workbook_format, process_file};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::args::{Cli, SpecRunMode, clean_prompt_path};

const C_NAME_LOG_FILE: &str = "listingkit.log";
const N_WIDTH_RULE: usize = 50;

/// Console logging at `info` (`debug` with `-v`, `RUST_LOG` wins), plus an
/// optional plain-text debug log at `path_log`.
fn init_logging(if_verbose: bool, path_log: Option<&Path>) -> Result<()> {
    let c_level = if if_verbose { "debug" } else { "info" };
    let filter_console =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(c_level));
    let layer_console = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(io::stdout)
        .with_filter(filter_console);

    let layer_file = match path_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layer_console)
        .with(layer_file)
        .init();
    Ok(())
}

/// Ask for the input path on stdin.
fn prompt_input_path() -> Result<PathBuf> {
    println!("Drop a .xlsx/.xlsm file onto this window or paste its path.");
    print!("File path: ");
    io::stdout().flush()?;

    let mut c_line = String::new();
    io::stdin().lock().read_line(&mut c_line)?;
    let c_path = clean_prompt_path(&c_line);
    if c_path.is_empty() {
        bail!("No input file given");
    }
    Ok(PathBuf::from(c_path))
}

fn print_summary(report: &ReportProcess, path_output: &Path) {
    let c_rule = "=".repeat(N_WIDTH_RULE);
    println!();
    println!("{c_rule}");
    println!("  [OK] Done");
    println!("{c_rule}");
    println!("  Groups:      {}", report.cnt_groups);
    println!(
        "  Ratios:      {} x 3:2, {} x square",
        report.count_ratio(EnumRatioType::ThreeToTwo),
        report.count_ratio(EnumRatioType::Square)
    );
    println!("  Rows:        {}", report.cnt_rows);
    if report.cnt_rows_dropped > 0 {
        println!("  Skipped:     {} trailing row(s)", report.cnt_rows_dropped);
    }
    println!("  Output file: {}", path_output.display());
    println!("{c_rule}");
    for c_warning in &report.warnings {
        println!("  [!] {c_warning}");
    }
}

fn run(path_input: &Path, path_output: Option<&Path>) -> Result<SpecProcessOutcome> {
    if !path_input.exists() {
        bail!("File not found: {}", path_input.display());
    }
    detect_workbook_format(path_input)?;

    let outcome = process_file(path_input, path_output)
        .with_context(|| format!("Processing failed: {}", path_input.display()))?;
    debug!("{}", outcome.report);
    Ok(outcome)
}

/// Keep the console window open until Enter is pressed.
fn pause_before_exit() {
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let mut c_line = String::new();
    let _ = io::stdin().lock().read_line(&mut c_line);
}

fn run_cli(cli: &Cli, mode: SpecRunMode) -> ExitCode {
    let result_input = if mode.if_prompt_input {
        prompt_input_path()
    } else {
        cli.input_file.clone().context("No input file given")
    };
    let path_input = match result_input {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let path_log = mode.if_log_file.then(|| {
        path_input
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(C_NAME_LOG_FILE)
    });
    if let Err(err) = init_logging(cli.verbose, path_log.as_deref()) {
        eprintln!("ERROR: {err:#}");
        return ExitCode::FAILURE;
    }
    info!("listingkit {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &path_log {
        debug!("Log file: {}", path.display());
    }

    match run(&path_input, cli.output.as_deref()) {
        Ok(outcome) => {
            print_summary(&outcome.report, &outcome.path_output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = SpecRunMode::from_cli(&cli);

    let code = run_cli(&cli, mode);
    if mode.if_pause_on_exit {
        pause_before_exit();
    }
    code
}
