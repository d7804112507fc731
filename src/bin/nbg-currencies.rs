//! nbg-currencies CLI - export National Bank of Georgia exchange rates
//!
//! ## Example Usage
//!
//! ```bash
//! # Every format, default file names
//! nbg-currencies
//!
//! # One format, default file name (nbg-currencies-2024-03-01.csv)
//! nbg-currencies csv
//!
//! # One format, explicit file
//! nbg-currencies json-array currencies.json
//!
//! # Pick formats from a checklist
//! nbg-currencies --interactive
//! ```

use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use nbg_currencies::config::Config;
use nbg_currencies::error::CurrencyError;
use nbg_currencies::fetcher::CurrencyFetcher;
use nbg_currencies::format::{supported_formats, OutputFormat};
use nbg_currencies::multiselect::prompt_multiselect;
use nbg_currencies::writer::{
    default_output_path, prepare_output_file, write_targets, OverwritePolicy,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// nbg-currencies: National Bank of Georgia exchange rates as JSON or CSV
#[derive(Parser, Debug)]
#[command(name = "nbg-currencies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch GEL exchange rates from nbg.gov.ge and export them as JSON or CSV", long_about = None)]
#[command(after_help = "Format can be one of: json-array, json-map, csv\nExample: nbg-currencies json-array currencies.json")]
struct Cli {
    /// Output format (json-array, json-map, csv). All formats when omitted
    #[arg(value_name = "FORMAT", value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Output file. Defaults to <prefix>-<suffix>-<YYYY-MM-DD>.<ext>
    #[arg(value_name = "FILE", requires = "format")]
    file: Option<PathBuf>,

    /// Choose formats from an interactive checklist
    #[arg(short, long, conflicts_with = "format")]
    interactive: bool,

    /// Overwrite existing files without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_format(tag: &str) -> Result<OutputFormat, String> {
    tag.parse().map_err(|_| {
        format!(
            "invalid format: {}. Format can be one of: {}",
            tag,
            supported_formats().join(", ")
        )
    })
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(cli.config.as_deref());

    if cli.verbose {
        println!(
            "{} v{}",
            "nbg-currencies".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("Source: {}", config.source.url.dimmed());
    }

    if let Err(e) = run(&cli, &config) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    let targets = if cli.interactive {
        match choose_formats()? {
            Some(formats) => default_targets(config, &formats, today),
            None => {
                println!("No formats selected. Exiting.");
                return Ok(());
            }
        }
    } else {
        resolve_targets(cli.format, cli.file.clone(), config, today)
    };

    let policy = if cli.yes {
        OverwritePolicy::Always
    } else {
        OverwritePolicy::Prompt
    };
    let prepared = prepare_targets(
        targets,
        policy,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    );
    let targets = prepared.ready;
    if targets.is_empty() {
        if prepared.failures > 0 {
            return Err(anyhow!("no usable output file ({} failed)", prepared.failures));
        }
        println!("Exiting. No changes were made.");
        return Ok(());
    }

    let fetcher = CurrencyFetcher::new(config.source.clone())?;
    let spinner = fetch_spinner(fetcher.url())?;
    let report = fetcher.fetch();
    spinner.finish_and_clear();

    let report = report.context("Failed to fetch currencies")?;
    println!(
        "Currencies fetched in {} milliseconds.",
        report.elapsed_ms()
    );

    let mut failures = prepared.failures;
    for write in write_targets(&report.currencies, &targets) {
        match write.result {
            Ok(()) => println!(
                "{} Currencies written to file {} ({}).",
                "✓".green().bold(),
                write.path.display(),
                write.format
            ),
            Err(e) => {
                eprintln!(
                    "{} Failed to write {} to {}: {}",
                    "Error:".red().bold(),
                    write.format,
                    write.path.display(),
                    e
                );
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "{} of {} outputs failed",
            failures,
            targets.len() + prepared.failures
        ));
    }

    Ok(())
}

/// Targets for the non-interactive forms of the command line
fn resolve_targets(
    format: Option<OutputFormat>,
    file: Option<PathBuf>,
    config: &Config,
    date: NaiveDate,
) -> Vec<(OutputFormat, PathBuf)> {
    match (format, file) {
        (Some(format), Some(file)) => vec![(format, file)],
        (Some(format), None) => default_targets(config, &[format], date),
        (None, _) => default_targets(config, &OutputFormat::all(), date),
    }
}

fn default_targets(
    config: &Config,
    formats: &[OutputFormat],
    date: NaiveDate,
) -> Vec<(OutputFormat, PathBuf)> {
    formats
        .iter()
        .map(|&format| {
            let path = default_output_path(
                &config.output.directory,
                &config.output.file_prefix,
                format,
                date,
            );
            (format, path)
        })
        .collect()
}

/// Returns `None` when the user quit or selected nothing
fn choose_formats() -> anyhow::Result<Option<Vec<OutputFormat>>> {
    let formats = OutputFormat::all();
    let options: Vec<String> = formats.iter().map(|f| f.to_string()).collect();

    let outcome = prompt_multiselect("Select output formats:", &options)?;
    if !outcome.submitted || outcome.selected.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        outcome.selected.to_vec().into_iter().map(|i| formats[i]).collect(),
    ))
}

/// Targets that passed the up-front checks, and how many failed them
struct PreparedTargets {
    ready: Vec<(OutputFormat, PathBuf)>,
    failures: usize,
}

/// Check every target up front. Declined overwrites are dropped;
/// any other problem is reported, counted and the target skipped.
fn prepare_targets<R: BufRead, W: Write>(
    targets: Vec<(OutputFormat, PathBuf)>,
    policy: OverwritePolicy,
    input: &mut R,
    output: &mut W,
) -> PreparedTargets {
    let mut ready = Vec::with_capacity(targets.len());
    let mut failures = 0;

    for (format, path) in targets {
        match prepare_output_file(&path, policy, input, output) {
            Ok(_) => ready.push((format, path)),
            Err(CurrencyError::OverwriteDeclined(path)) => {
                println!("Skipping {}.", path.display());
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                failures += 1;
            }
        }
    }

    PreparedTargets { ready, failures }
}

fn fetch_spinner(url: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(format!("Fetching currencies from {}...", url));
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_cli_no_args() {
        let cli = Cli::try_parse_from(["nbg-currencies"]).unwrap();
        assert!(cli.format.is_none());
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_cli_format_and_file() {
        let cli = Cli::try_parse_from(["nbg-currencies", "json-map", "rates.json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::JsonMap));
        assert_eq!(cli.file, Some(PathBuf::from("rates.json")));
    }

    #[test]
    fn test_cli_invalid_format() {
        let err = Cli::try_parse_from(["nbg-currencies", "yaml"]).unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_cli_help_is_not_a_failure() {
        let err = Cli::try_parse_from(["nbg-currencies", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_cli_too_many_args() {
        assert!(Cli::try_parse_from(["nbg-currencies", "csv", "a.csv", "b.csv"]).is_err());
    }

    #[test]
    fn test_cli_interactive_conflicts_with_format() {
        assert!(Cli::try_parse_from(["nbg-currencies", "-i", "csv"]).is_err());
        assert!(Cli::try_parse_from(["nbg-currencies", "--interactive", "-y"]).is_ok());
    }

    #[test]
    fn test_resolve_all_formats() {
        let targets = resolve_targets(None, None, &Config::default(), date());
        let names: Vec<String> = targets
            .iter()
            .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                "nbg-currencies-array-2024-03-01.json",
                "nbg-currencies-map-2024-03-01.json",
                "nbg-currencies-2024-03-01.csv",
            ]
        );
    }

    #[test]
    fn test_resolve_single_format() {
        let targets = resolve_targets(Some(OutputFormat::Csv), None, &Config::default(), date());
        assert_eq!(
            targets,
            vec![(OutputFormat::Csv, PathBuf::from(".").join("nbg-currencies-2024-03-01.csv"))]
        );

        let targets = resolve_targets(
            Some(OutputFormat::JsonArray),
            Some(PathBuf::from("out.json")),
            &Config::default(),
            date(),
        );
        assert_eq!(targets, vec![(OutputFormat::JsonArray, PathBuf::from("out.json"))]);
    }

    #[test]
    fn test_prepare_counts_failed_targets() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("rates.csv");
        let targets = vec![
            (OutputFormat::JsonArray, dir.path().to_path_buf()),
            (OutputFormat::Csv, good.clone()),
        ];

        let prepared = prepare_targets(
            targets,
            OverwritePolicy::Always,
            &mut io::empty(),
            &mut io::sink(),
        );

        assert_eq!(prepared.failures, 1);
        assert_eq!(prepared.ready, vec![(OutputFormat::Csv, good.clone())]);
        assert!(good.exists());
    }

    #[test]
    fn test_prepare_declined_overwrite_is_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("rates.json");
        std::fs::write(&existing, "[]").unwrap();

        let prepared = prepare_targets(
            vec![(OutputFormat::JsonMap, existing)],
            OverwritePolicy::Prompt,
            &mut "n\n".as_bytes(),
            &mut io::sink(),
        );

        assert!(prepared.ready.is_empty());
        assert_eq!(prepared.failures, 0);
    }
}
